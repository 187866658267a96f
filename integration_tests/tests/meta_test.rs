//! Metadata lookup, lint pass, and catalog cross-checks

use canreg_common::catalog::Catalog;
use canreg_common::meta::{DisplayType, MetaRecord, MetaTable};
use canreg_common::objects::ObjectKey;
use canreg_common::NodeId;
use canreg_node::object_dict::{ObjectDict, ObjectEntry};
use canreg_node::{DriverBundle, Node, NodeConfig};
use integration_tests::device;
use integration_tests::mocks::{MockCan, MockStore, MockTimer};

fn make_node<'a>(
    rows: &'a [ObjectEntry],
    meta: &'a [MetaRecord],
    store: &'a MockStore,
    can: &'a mut MockCan,
    timer: &'a MockTimer,
) -> Node<'a> {
    Node::new(
        NodeConfig::new().with_node_id(NodeId::Unconfigured),
        ObjectDict::new(rows).unwrap(),
        MetaTable::new(meta).unwrap(),
        store,
        DriverBundle { can, timer },
    )
}

#[test]
fn test_describe_returns_fixture_records() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer);

    let heartbeat = node.describe(0x1017, 0).unwrap();
    assert_eq!("HEARTBEAT_TIME", heartbeat.name);
    assert_eq!("Comm", heartbeat.group);
    assert_eq!("ms", heartbeat.unit);
    assert_eq!(DisplayType::Uint32, heartbeat.display);
    assert!(heartbeat.monitorable);
    assert!(heartbeat.configurable);

    let cmd = node.describe(0x2102, 1).unwrap();
    assert_eq!(DisplayType::Func, cmd.display);
    assert!(!cmd.configurable);

    // Not every dictionary entry is described
    assert!(node.describe(0x1005, 0).is_none());
    assert!(node.describe(0x1018, 1).is_none());
}

#[test]
fn test_fixture_metadata_lints_clean() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let mut node = make_node(&rows, &meta, &store, &mut can, &timer);

    assert_eq!(0, node.start().lint_findings);
}

#[test]
fn test_lint_counts_records_without_entries() {
    let rows = device::entries();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();

    // A configurable record pointing at an absent object is a finding
    let mut records = device::meta_records()[..11].to_vec();
    records.push(
        MetaRecord::new(
            ObjectKey::new(0x3000, 0),
            "Control",
            "Limits",
            "MAX_TORQUE",
            "Nm",
            DisplayType::Uint32,
        )
        .configurable(true),
    );
    records.push(MetaRecord::end_marker());

    let mut node = make_node(&rows, &records, &store, &mut can, &timer);
    assert_eq!(1, node.start().lint_findings);
}

#[test]
fn test_catalog_mirrors_device_metadata() {
    const CATALOG: &str = r#"
device = "canreg vmu"

[[entries]]
index = 0x1017
group = "Comm"
subgroup = "Heartbeat"
name = "HEARTBEAT_TIME"
unit = "ms"
display = "uint32"
monitorable = true
configurable = true

[[entries]]
index = 0x2101
sub = 1
group = "Control"
subgroup = "Gains"
name = "P_GAIN"
display = "float32"
monitorable = true
configurable = true

[[entries]]
index = 0x2102
sub = 1
group = "Eeprom"
subgroup = "Cmd"
name = "EEPROM_CMD_READ"
display = "func"
"#;

    let catalog = Catalog::load_from_str(CATALOG).unwrap();
    assert_eq!("canreg vmu", catalog.device);

    let meta = device::meta_records();
    let table = MetaTable::new(&meta).unwrap();
    for entry in &catalog.entries {
        let record = table
            .describe(entry.index, entry.sub)
            .expect("catalog entry missing from device table");
        assert_eq!(record.name, entry.name);
        assert_eq!(record.group, entry.group);
        assert_eq!(record.subgroup, entry.subgroup);
        assert_eq!(record.unit, entry.unit);
        assert_eq!(record.display, DisplayType::from(entry.display));
        assert_eq!(record.monitorable, entry.monitorable);
        assert_eq!(record.configurable, entry.configurable);
    }
}
