// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finflow::models::TransactionKind;
use finflow::validation::{
    LoginForm, RegisterForm, ResetPasswordForm, SalaryForm, TransactionForm, is_valid_email,
    summarize,
};
use rust_decimal::Decimal;

fn fields<T>(r: Result<T, Vec<finflow::validation::FieldError>>) -> Vec<&'static str> {
    match r {
        Ok(_) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.field).collect(),
    }
}

#[test]
fn transaction_form_parses_into_a_new_transaction() {
    let form = TransactionForm {
        kind: "expense".into(),
        category: " Alimentação ".into(),
        amount: "45.90".into(),
        description: "Supermercado".into(),
        date: "2025-06-18".into(),
    };
    let new = form.validate().unwrap();
    assert_eq!(new.kind, TransactionKind::Expense);
    assert_eq!(new.category, "Alimentação");
    assert_eq!(new.amount, Decimal::new(4590, 2));
    assert_eq!(new.date, NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
}

#[test]
fn transaction_form_reports_every_bad_field() {
    let form = TransactionForm {
        kind: "gift".into(),
        category: "".into(),
        amount: "0".into(),
        description: " ".into(),
        date: "18/06/2025".into(),
    };
    assert_eq!(
        fields(form.validate()),
        vec!["type", "category", "amount", "description", "date"]
    );
}

#[test]
fn amounts_must_be_numbers_of_at_least_one_cent() {
    let mut form = TransactionForm {
        kind: "income".into(),
        category: "Job".into(),
        amount: "abc".into(),
        description: "x".into(),
        date: "2025-06-18".into(),
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors[0].message, "'abc' is not a number");

    form.amount = "0.001".into();
    assert_eq!(fields(form.validate()), vec!["amount"]);
    form.amount = "0.01".into();
    assert!(form.validate().is_ok());

    form.amount = "1000000000000000.01".into();
    let errors = form.validate().unwrap_err();
    assert_eq!(errors[0].message, "amount is too large");
    form.amount = "1000000000000000".into();
    assert!(form.validate().is_ok());
}

#[test]
fn salary_form_needs_amount_date_and_source() {
    let ok = SalaryForm {
        amount: "3000".into(),
        receipt_date: "2025-06-05".into(),
        source: "ACME".into(),
    }
    .validate()
    .unwrap();
    assert_eq!(ok.amount, Decimal::new(3000, 0));
    assert_eq!(ok.source.as_deref(), Some("ACME"));

    let bad = SalaryForm::default();
    assert_eq!(fields(bad.validate()), vec!["amount", "receipt_date", "source"]);
}

#[test]
fn login_form_checks_email_and_password_length() {
    let form = LoginForm {
        email: "demo@finflow.com".into(),
        password: "demo123".into(),
    };
    assert!(form.validate().is_ok());

    let bad = LoginForm {
        email: "demo@".into(),
        password: "12345".into(),
    };
    assert_eq!(fields(bad.validate()), vec!["email", "password"]);
}

#[test]
fn register_form_enforces_password_strength_and_confirmation() {
    let mut form = RegisterForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password: "Secret1".into(),
        confirm_password: "Secret1".into(),
    };
    assert!(form.validate().is_ok());

    form.password = "secret1".into();
    form.confirm_password = "secret1".into();
    assert_eq!(fields(form.validate()), vec!["password"]);

    form.password = "Secret1".into();
    form.confirm_password = "Secret2".into();
    form.name = "A".into();
    let errors = form.validate().unwrap_err();
    assert_eq!(
        summarize(&errors),
        "name: name must have at least 2 characters; confirm_password: passwords do not match"
    );
}

#[test]
fn reset_password_form_and_email_shape() {
    assert!(ResetPasswordForm { email: "a@b.co".into() }.validate().is_ok());
    assert!(ResetPasswordForm::default().validate().is_err());
    assert!(is_valid_email(" user@mail.example.org "));
    assert!(!is_valid_email("user@@mail"));
    assert!(!is_valid_email("no spaces@mail.com"));
}
