use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use uuid::Uuid;

use customers::contract::{
    error::CustomersError,
    model::{BusinessAttributes, Customer, CustomerType, EditCustomerCommand, Gender},
};
use customers::domain::error::DomainError;
// Note: These internal module imports are only for testing
// External consumers should only use the `contract` module

fn sample_customer() -> Customer {
    let now = Utc::now();
    Customer {
        id: Uuid::new_v4(),
        guest: false,
        email: "test@example.com".to_string(),
        password_hash: Some("hash".to_string()),
        first_name: "Test".to_string(),
        last_name: "Customer".to_string(),
        gender: Some(Gender::Diverse),
        birthday: NaiveDate::from_ymd_opt(1985, 3, 2),
        enabled: true,
        newsletter: true,
        partner_offers: false,
        group_ids: BTreeSet::from([1]),
        default_group_id: 1,
        business: BusinessAttributes::default(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_edit_command_defaults_to_no_changes() {
    let id = Uuid::new_v4();
    let command = EditCustomerCommand::new(id);

    assert_eq!(command.customer_id, id);
    assert_eq!(command.email, None);
    assert_eq!(command.first_name, None);
    assert_eq!(command.last_name, None);
    assert_eq!(command.password, None);
    assert_eq!(command.group_ids, None);
    assert_eq!(command.default_group_id, None);
    assert_eq!(command.company, None);
}

#[test]
fn test_empty_string_is_a_concrete_value() {
    let mut command = EditCustomerCommand::new(Uuid::new_v4());
    command.last_name = Some(String::new());

    // Some("") means "set to empty", None means "leave unchanged"
    assert_ne!(command.last_name, None);
    assert_eq!(command.last_name.as_deref(), Some(""));
}

#[test]
fn test_gender_codes_roundtrip() {
    for gender in [Gender::Male, Gender::Female, Gender::Diverse] {
        assert_eq!(Gender::parse(gender.as_str()), Some(gender));
    }
    assert_eq!(Gender::parse("MALE"), Some(Gender::Male));
    assert_eq!(Gender::parse("unknown"), None);
}

#[test]
fn test_customer_type_derived_from_guest_flag() {
    let mut customer = sample_customer();
    assert_eq!(customer.customer_type(), CustomerType::Registered);
    customer.guest = true;
    assert_eq!(customer.customer_type(), CustomerType::Guest);

    assert_eq!(CustomerType::parse("guest"), Some(CustomerType::Guest));
    assert_eq!(
        CustomerType::parse("registered"),
        Some(CustomerType::Registered)
    );
    assert_eq!(CustomerType::parse("wholesale"), None);
}

#[test]
fn test_customer_validate_accepts_sample() {
    let customer = sample_customer();
    assert!(customer.validate(100).is_ok());
}

#[test]
fn test_customer_validate_rejects_bad_email() {
    let mut customer = sample_customer();
    customer.email = "not-an-email".to_string();

    let issue = customer.validate(100).unwrap_err();
    assert_eq!(issue.field, "email");
}

#[test]
fn test_customer_validate_rejects_future_birthday() {
    let mut customer = sample_customer();
    customer.birthday = Some(Utc::now().date_naive() + Duration::days(2));

    let issue = customer.validate(100).unwrap_err();
    assert_eq!(issue.field, "birthday");
}

#[test]
fn test_customer_validate_rejects_bad_website() {
    let mut customer = sample_customer();
    customer.business.website = "not a url".to_string();

    let issue = customer.validate(100).unwrap_err();
    assert_eq!(issue.field, "website");
}

#[test]
fn test_customer_validate_rejects_overlong_names() {
    let mut customer = sample_customer();
    customer.last_name = "x".repeat(101);

    let issue = customer.validate(100).unwrap_err();
    assert_eq!(issue.field, "lastname");
}

#[test]
fn test_contract_errors() {
    let id = Uuid::new_v4();
    let error = CustomersError::not_found(id);

    match error {
        CustomersError::NotFound { id: error_id } => {
            assert_eq!(error_id, id);
        }
        _ => panic!("Expected NotFound error"),
    }

    let error = CustomersError::email_conflict("test@example.com".to_string());

    match error {
        CustomersError::EmailConflict { email } => {
            assert_eq!(email, "test@example.com");
        }
        _ => panic!("Expected EmailConflict error"),
    }

    let error = CustomersError::invalid_default_group(7);

    match error {
        CustomersError::InvalidDefaultGroup { group_id } => {
            assert_eq!(group_id, 7);
        }
        _ => panic!("Expected InvalidDefaultGroup error"),
    }

    let error = CustomersError::missing_field("lastname".to_string());

    match error {
        CustomersError::MissingField { field } => {
            assert_eq!(field, "lastname");
        }
        _ => panic!("Expected MissingField error"),
    }

    let error = CustomersError::validation("broken");

    match error {
        CustomersError::Validation { message } => {
            assert_eq!(message, "broken");
        }
        _ => panic!("Expected Validation error"),
    }

    let error = CustomersError::internal();

    match error {
        CustomersError::Internal => {}
        _ => panic!("Expected Internal error"),
    }
}

#[test]
fn test_domain_errors() {
    let id = Uuid::new_v4();
    let error = DomainError::customer_not_found(id);

    match error {
        DomainError::CustomerNotFound { id: error_id } => {
            assert_eq!(error_id, id);
        }
        _ => panic!("Expected CustomerNotFound error"),
    }

    let error = DomainError::duplicate_email("dup@example.com");

    match error {
        DomainError::DuplicateEmail { email } => {
            assert_eq!(email, "dup@example.com");
        }
        _ => panic!("Expected DuplicateEmail error"),
    }

    let error = DomainError::default_group_not_in_groups(3);

    match error {
        DomainError::DefaultGroupNotInGroups { default_group_id } => {
            assert_eq!(default_group_id, 3);
        }
        _ => panic!("Expected DefaultGroupNotInGroups error"),
    }

    let error = DomainError::missing_required_field("lastname");

    match error {
        DomainError::MissingRequiredField { field } => {
            assert_eq!(field, "lastname");
        }
        _ => panic!("Expected MissingRequiredField error"),
    }

    let error = DomainError::invalid_customer("email", "bad format");

    match error {
        DomainError::InvalidCustomer { field, message } => {
            assert_eq!(field, "email");
            assert_eq!(message, "bad format");
        }
        _ => panic!("Expected InvalidCustomer error"),
    }

    let error = DomainError::persistence_failure("constraint violated");

    match error {
        DomainError::PersistenceFailure { message } => {
            assert_eq!(message, "constraint violated");
        }
        _ => panic!("Expected PersistenceFailure error"),
    }

    let error = DomainError::database("connection lost");

    match error {
        DomainError::Database { message } => {
            assert_eq!(message, "connection lost");
        }
        _ => panic!("Expected Database error"),
    }
}
