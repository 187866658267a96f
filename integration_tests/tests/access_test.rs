//! Mediator behavior over the full fixture device

use canreg_common::meta::{MetaRecord, MetaTable};
use canreg_common::{AccessError, AccessOp, NodeId};
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
    node_id: NodeId,
) -> Node<'a> {
    Node::new(
        NodeConfig::new().with_node_id(node_id),
        ObjectDict::new(rows).unwrap(),
        MetaTable::new(meta).unwrap(),
        store,
        DriverBundle { can, timer },
    )
}

#[test]
fn test_device_type_is_read_only_constant() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    let resp = node.handle_request(0x1000, 0, AccessOp::Read, &[]).unwrap();
    assert_eq!(&0x198u32.to_le_bytes(), resp.as_slice());

    let err = node
        .handle_request(0x1000, 0, AccessOp::Write, &0u32.to_le_bytes())
        .unwrap_err();
    assert_eq!(AccessError::AccessDenied, err);
    assert_eq!(0x0601_0000, err.abort_code());
    // The slot is untouched
    assert_eq!(Ok(0x198), node.read_u32(0x1000, 0));
}

#[test]
fn test_absent_keys_report_not_found() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    let err = node
        .handle_request(0x1F00, 0, AccessOp::Read, &[])
        .unwrap_err();
    assert_eq!(AccessError::NotFound, err);
    assert_eq!(0x0602_0000, err.abort_code());

    // Present index, absent sub
    assert_eq!(
        Err(AccessError::NotFound),
        node.handle_request(0x1018, 5, AccessOp::Read, &[])
    );
}

#[test]
fn test_heartbeat_write_resolves_without_store_query() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    node.handle_request(0x1017, 0, AccessOp::Write, &500u16.to_le_bytes())
        .unwrap();
    assert_eq!(Ok(500), node.read_u16(0x1017, 0));

    // A write to an unresolved slot assigns it directly; plain deferred
    // values are cache-only
    assert_eq!(0, store.get_count());
    assert!(store.set_log().is_empty());
}

#[test]
fn test_wrong_size_write_leaves_value_intact() {
    use canreg_common::constants::store_keys;

    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::seeded(&[(store_keys::PRODUCER_HEARTBEAT_TIME, 100)]);
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    let err = node
        .handle_request(0x1017, 0, AccessOp::Write, &500u32.to_le_bytes())
        .unwrap_err();
    assert_eq!(AccessError::SizeMismatch, err);
    assert_eq!(0x0607_0010, err.abort_code());
    assert_eq!(
        Err(AccessError::SizeMismatch),
        node.handle_request(0x1017, 0, AccessOp::Write, &[1])
    );

    assert_eq!(Ok(100), node.read_u16(0x1017, 0));
}

#[test]
fn test_string_objects_serve_exact_bytes() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    let name = node.handle_request(0x1008, 0, AccessOp::Read, &[]).unwrap();
    assert_eq!(b"canreg vmu", name.as_slice());

    let commit = node.handle_request(0x2100, 0, AccessOp::Read, &[]).unwrap();
    assert_eq!(device::COMMIT_HASH, commit.as_slice());

    assert_eq!(
        Err(AccessError::AccessDenied),
        node.handle_request(0x1008, 0, AccessOp::Write, b"other name")
    );
}

#[test]
fn test_identity_record() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    assert_eq!(Ok(4), node.read_u8(0x1018, 0));
    assert_eq!(Ok(device::VENDOR_ID), node.read_u32(0x1018, 1));
    assert_eq!(Ok(device::PRODUCT_CODE), node.read_u32(0x1018, 2));
    assert_eq!(Ok(device::REVISION), node.read_u32(0x1018, 3));

    // The serial slot reads through the externally owned cell
    device::SERIAL.store(0x00C0_FFEE);
    assert_eq!(Ok(0x00C0_FFEE), node.read_u32(0x1018, 4));

    // Identity subs are read only
    assert_eq!(
        Err(AccessError::AccessDenied),
        node.handle_request(0x1018, 1, AccessOp::Write, &0u32.to_le_bytes())
    );
}

#[test]
fn test_sdo_cob_ids_follow_node_id() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let id = NodeId::new(0x21).unwrap();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, id);

    assert_eq!(Ok(2), node.read_u8(0x1200, 0));
    assert_eq!(Ok(0x621), node.read_u32(0x1200, 1));
    assert_eq!(Ok(0x5A1), node.read_u32(0x1200, 2));
}

#[test]
fn test_unconfigured_node_serves_base_cob_ids() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    assert_eq!(Ok(0x600), node.read_u32(0x1200, 1));
    assert_eq!(Ok(0x580), node.read_u32(0x1200, 2));
}

#[test]
fn test_command_counters_are_write_only() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    assert_eq!(
        Err(AccessError::AccessDenied),
        node.handle_request(0x2102, 1, AccessOp::Read, &[])
    );
    assert_eq!(
        Err(AccessError::AccessDenied),
        node.handle_request(0x2102, 2, AccessOp::Read, &[])
    );
}

#[test]
fn test_operating_mode_round_trip() {
    let rows = device::entries();
    let meta = device::meta_records();
    let store = MockStore::default();
    let mut can = MockCan::default();
    let timer = MockTimer::default();
    let node = make_node(&rows, &meta, &store, &mut can, &timer, NodeId::Unconfigured);

    node.handle_request(0x2104, 0, AccessOp::Write, &[3]).unwrap();
    assert_eq!(Ok(3), node.read_u8(0x2104, 0));

    assert_eq!(
        Err(AccessError::SizeMismatch),
        node.handle_request(0x2104, 0, AccessOp::Write, &[3, 0])
    );
}
