//! # Wire Messages
//!
//! Protobuf messages for the subset of the network API this crate speaks.
//! They are declared by hand with `prost` derives instead of generated from
//! `.proto` files, so the build needs no `protoc`. Field numbers follow the
//! public HAPI definitions and must not be renumbered.

pub mod addressbook;
pub mod basic;
pub mod crypto;
pub mod transaction;

pub use addressbook::*;
pub use basic::*;
pub use crypto::*;
pub use transaction::*;

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn body_data_uses_node_update_tag() {
        let body = TransactionBody {
            data: Some(transaction_body::Data::NodeUpdate(NodeUpdateTransactionBody {
                node_id: 7,
                ..Default::default()
            })),
            ..Default::default()
        };
        let bytes = body.encode_to_vec();
        // Field 55, wire type 2 => varint key (55 << 3) | 2 = 442 = [0xba, 0x03].
        assert_eq!(&bytes[..2], &[0xba, 0x03]);
    }

    #[test]
    fn empty_transaction_list_decodes_from_empty_bytes() {
        let list = TransactionList::decode(&[][..]).unwrap();
        assert!(list.transaction_list.is_empty());
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let mut bytes = Timestamp { seconds: 5, nanos: 1 }.encode_to_vec();
        // Field 9, varint, value 1.
        bytes.extend_from_slice(&[0x48, 0x01]);
        let ts = Timestamp::decode(bytes.as_slice()).unwrap();
        assert_eq!(ts.seconds, 5);
        assert_eq!(ts.nanos, 1);
    }
}
