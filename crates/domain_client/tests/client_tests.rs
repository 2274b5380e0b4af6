//! Tests for client records, addresses, contacts and their JSON shape

use domain_client::{
    AddressDraft, ClientError, ClientPayload, ClientRecord, Contact, ContactKind, PersonType,
    format_phone, format_zip_code,
};
use serde_json::json;
use test_utils::{AddressDraftBuilder, ClientFixtures, ClientRecordBuilder};

mod person_type {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        assert_eq!("pf".parse::<PersonType>().unwrap(), PersonType::Individual);
        assert_eq!("PJ".parse::<PersonType>().unwrap(), PersonType::Company);
        assert!("xx".parse::<PersonType>().is_err());
    }

    #[test]
    fn test_serialized_as_api_codes() {
        assert_eq!(serde_json::to_value(PersonType::Company).unwrap(), json!("pj"));
        assert_eq!(PersonType::Individual.code(), "pf");
    }
}

mod address {
    use super::*;

    #[test]
    fn test_draft_round_trip_from_address() {
        let address = ClientFixtures::address();
        let draft = AddressDraft::from(&address);
        assert_eq!(draft.to_address().unwrap(), Some(address));
    }

    #[test]
    fn test_values_are_trimmed() {
        let draft = AddressDraftBuilder::complete().with_street("  Rua Augusta ").build();
        let address = draft.to_address().unwrap().unwrap();
        assert_eq!(address.street, "Rua Augusta");
    }

    #[test]
    fn test_partial_draft_lists_missing_fields() {
        let draft = AddressDraftBuilder::blank().with_zip_code("01310-200").build();
        match draft.to_address() {
            Err(ClientError::IncompleteAddress { missing }) => {
                assert_eq!(missing.len(), 6);
                assert!(missing.iter().any(|field| field == "street"));
                assert!(!missing.iter().any(|field| field == "zipCode"));
            }
            other => panic!("expected incomplete address, got {:?}", other),
        }
    }

    #[test]
    fn test_format_for_display() {
        let formatted = ClientFixtures::address().format();
        assert!(formatted.contains("Avenida Paulista, 1578"));
        assert!(formatted.contains("01310-200 Brasil"));
    }

    #[test]
    fn test_draft_deserializes_with_missing_fields() {
        let draft: AddressDraft = serde_json::from_value(json!({ "city": "Recife" })).unwrap();
        assert_eq!(draft.city, "Recife");
        assert_eq!(draft.missing_fields().len(), 6);
    }
}

mod contacts {
    use super::*;

    #[test]
    fn test_email_is_trimmed() {
        let contact = Contact::email("  maria@example.com ").unwrap();
        assert_eq!(contact.value, "maria@example.com");
    }

    #[test]
    fn test_email_shape() {
        assert!(Contact::email("maria.silva+crm@example.com.br").is_ok());
        assert!(Contact::email("maria.example.com").is_err());
        assert!(Contact::email("").is_err());
    }

    #[test]
    fn test_phone_needs_eleven_digits() {
        assert!(Contact::phone("11987654321").is_ok());
        assert!(Contact::phone("+55 (11) 98765-4321").is_ok());
        assert!(Contact::phone("1198765432").is_err());
    }

    #[test]
    fn test_phone_display_uses_mask() {
        let contact = Contact::phone("11987654321").unwrap();
        assert_eq!(contact.display(), "(11) 98765-4321");
    }

    #[test]
    fn test_rejection_message_names_the_rule() {
        let err = Contact::phone("123").unwrap_err();
        assert_eq!(err.to_string(), "Invalid contact: '123' must have at least 11 digits");
    }
}

mod masks {
    use super::*;

    #[test]
    fn test_phone_partial() {
        assert_eq!(format_phone("11"), "(11");
        assert_eq!(format_phone("113"), "(11) 3");
        assert_eq!(format_phone("113333"), "(11) 3333");
        assert_eq!(format_phone("1133334"), "(11) 3333-4");
    }

    #[test]
    fn test_zip_code_partial() {
        assert_eq!(format_zip_code("01310"), "01310");
        assert_eq!(format_zip_code("013102"), "01310-2");
    }
}

mod records {
    use super::*;

    #[test]
    fn test_payload_json_shape() {
        let payload = ClientRecordBuilder::new().without_address().payload();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["personType"], json!("pf"));
        assert_eq!(value["data"]["fullName"], json!("Maria da Silva"));
        assert_eq!(value["data"]["taxDocument"], json!("111.444.777-35"));
        assert_eq!(value["data"]["birthdate"], json!("1990-04-12"));
        assert!(value["data"].get("fantasyName").is_none());
        assert!(value["address"].is_null());
        assert_eq!(value["contacts"][0], json!({ "kind": "email", "value": "maria@example.com" }));
    }

    #[test]
    fn test_payload_parses_api_json() {
        let payload: ClientPayload = serde_json::from_value(json!({
            "personType": "pj",
            "data": {
                "fullName": "Padaria Pão Quente Ltda",
                "taxDocument": "11222333000181",
                "registryId": "110.042.490.114"
            },
            "address": null,
            "contacts": [{ "kind": "phone", "value": "11987654321" }]
        }))
        .unwrap();

        assert_eq!(payload.person_type, PersonType::Company);
        assert!(payload.data.birthdate.is_none());
        assert_eq!(payload.contacts[0].kind, ContactKind::Phone);
    }

    #[test]
    fn test_display_name_prefers_fantasy_name_for_companies() {
        let company = ClientRecordBuilder::new().company().build();
        assert_eq!(company.display_name(), "Pão Quente");

        let individual = ClientRecordBuilder::new().build();
        assert_eq!(individual.display_name(), "Maria da Silva");
    }

    #[test]
    fn test_apply_replaces_data() {
        let mut record: ClientRecord = ClientRecordBuilder::new().build();
        let created_at = record.created_at;
        let payload = ClientRecordBuilder::new().without_address().with_contacts(vec![]).payload();

        record.apply(payload);

        assert!(record.address.is_none());
        assert!(record.contacts.is_empty());
        assert_eq!(record.created_at, created_at);
        assert!(record.updated_at >= created_at);
    }

    #[test]
    fn test_location() {
        let record = ClientRecordBuilder::new().build();
        assert_eq!(record.location(), format!("/clients/{}", record.id.as_uuid()));
    }
}
