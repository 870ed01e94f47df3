//! Tests for notification records and raw decoding.

use super::*;

mod change_kind {
    use super::*;

    #[test]
    fn maps_known_raw_codes() {
        assert_eq!(ChangeKind::from_raw(0), ChangeKind::ParameterChanged);
        assert_eq!(ChangeKind::from_raw(1), ChangeKind::Added);
        assert_eq!(ChangeKind::from_raw(2), ChangeKind::Deleted);
        assert_eq!(ChangeKind::from_raw(3), ChangeKind::Initial);
    }

    #[test]
    fn unknown_code_is_preserved() {
        assert_eq!(ChangeKind::from_raw(42), ChangeKind::Other(42));
        assert_eq!(ChangeKind::from_raw(-1), ChangeKind::Other(-1));
    }

    #[test]
    fn only_initial_is_initial() {
        assert!(ChangeKind::Initial.is_initial());
        assert!(!ChangeKind::Added.is_initial());
        assert!(!ChangeKind::Other(3).is_initial());
    }

    #[test]
    fn display_names() {
        assert_eq!(ChangeKind::ParameterChanged.to_string(), "Parameter Notification");
        assert_eq!(ChangeKind::Added.to_string(), "Add Instance");
        assert_eq!(ChangeKind::Deleted.to_string(), "Delete Instance");
        assert_eq!(ChangeKind::Initial.to_string(), "Initial Notification");
        assert_eq!(ChangeKind::Other(9).to_string(), "Unknown Notification (9)");
    }
}

mod origin {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(Origin::Interface.to_string(), "IP Interface change");
        assert_eq!(Origin::Address.to_string(), "Unicast IP Address change");
    }
}

mod raw_socket_address {
    use super::*;

    #[test]
    fn decodes_ipv4_exactly() {
        let raw = RawSocketAddress::v4(Ipv4Addr::new(192, 168, 1, 20));

        assert_eq!(raw.family(), AF_INET);
        assert_eq!(
            raw.decode(),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)))
        );
    }

    #[test]
    fn decodes_ipv6_exactly() {
        let addr: Ipv6Addr = "fe80::1:2:3:4".parse().unwrap();
        let raw = RawSocketAddress::v6(addr);

        assert_eq!(raw.family(), AF_INET6);
        assert_eq!(raw.decode(), Some(IpAddr::V6(addr)));
    }

    #[test]
    fn unknown_family_decodes_to_none() {
        let mut bytes = [0u8; RawSocketAddress::LEN];
        bytes[..2].copy_from_slice(&99u16.to_ne_bytes());
        bytes[4..8].copy_from_slice(&[10, 0, 0, 1]);

        assert_eq!(RawSocketAddress::from_bytes(bytes).decode(), None);
    }

    #[test]
    fn zeroed_image_is_unspecified_family() {
        let raw = RawSocketAddress::from_bytes([0u8; RawSocketAddress::LEN]);
        assert_eq!(raw.family(), 0);
        assert_eq!(raw.decode(), None);
    }
}

mod from_raw {
    use super::*;

    #[test]
    fn interface_added_with_index_seven() {
        let notification = Notification::from_raw(Origin::Interface, 1, 7, None);

        assert_eq!(
            notification,
            Notification {
                origin: Origin::Interface,
                kind: ChangeKind::Added,
                interface_index: 7,
                address: None,
            }
        );
    }

    #[test]
    fn interface_origin_ignores_supplied_address() {
        let raw = RawSocketAddress::v4(Ipv4Addr::new(10, 0, 0, 1));
        let notification = Notification::from_raw(Origin::Interface, 0, 3, Some(&raw));

        assert_eq!(notification.address, None);
    }

    #[test]
    fn address_origin_decodes_ipv4() {
        let raw = RawSocketAddress::v4(Ipv4Addr::new(172, 16, 5, 9));
        let notification = Notification::from_raw(Origin::Address, 2, 12, Some(&raw));

        assert_eq!(notification.origin, Origin::Address);
        assert_eq!(notification.kind, ChangeKind::Deleted);
        assert_eq!(notification.interface_index, 12);
        assert_eq!(
            notification.address,
            Some(IpAddr::V4(Ipv4Addr::new(172, 16, 5, 9)))
        );
    }

    #[test]
    fn address_origin_with_unknown_family_has_no_address() {
        let mut bytes = [0u8; RawSocketAddress::LEN];
        bytes[..2].copy_from_slice(&1u16.to_ne_bytes());
        let raw = RawSocketAddress::from_bytes(bytes);

        let notification = Notification::from_raw(Origin::Address, 1, 4, Some(&raw));

        assert_eq!(notification.origin, Origin::Address);
        assert_eq!(notification.address, None);
    }

    #[test]
    fn address_origin_without_row_has_no_address() {
        let notification = Notification::from_raw(Origin::Address, 3, 0, None);

        assert_eq!(notification.kind, ChangeKind::Initial);
        assert_eq!(notification.address, None);
    }
}

mod display {
    use super::*;

    #[test]
    fn interface_notification() {
        let notification = Notification::interface(ChangeKind::Deleted, 5);
        assert_eq!(
            notification.to_string(),
            "IP Interface change: Delete Instance (interface 5)"
        );
    }

    #[test]
    fn address_notification_includes_address() {
        let notification = Notification::address(
            ChangeKind::Added,
            9,
            Some("10.1.2.3".parse().unwrap()),
        );
        assert_eq!(
            notification.to_string(),
            "Unicast IP Address change: Add Instance (interface 9) 10.1.2.3"
        );
    }
}

mod serialization {
    use super::*;

    #[test]
    fn serializes_to_snake_case_json() {
        let notification = Notification::address(
            ChangeKind::ParameterChanged,
            2,
            Some("192.0.2.1".parse().unwrap()),
        );

        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(json["origin"], "address");
        assert_eq!(json["kind"], "parameter_changed");
        assert_eq!(json["interface_index"], 2);
        assert_eq!(json["address"], "192.0.2.1");
    }

    #[test]
    fn missing_address_serializes_as_null() {
        let notification = Notification::interface(ChangeKind::Initial, 0);
        let json = serde_json::to_value(&notification).unwrap();

        assert!(json["address"].is_null());
    }
}
