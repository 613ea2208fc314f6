//! Customers and the best-effort e-mail join used by the transaction tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Whether a customer is a business or a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerKind {
    Empresa,
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStatus {
    Activo,
    Nuevo,
    Moroso,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    pub balance: f64,
    pub status: CustomerStatus,
}

/// Looks up customers by e-mail, ignoring case.
///
/// Records are matched to customers purely by convention, so a lookup that
/// misses returns `None` rather than an error. When two customers share an
/// e-mail the first one wins.
#[derive(Debug, Default)]
pub struct CustomerIndex<'a> {
    by_email: HashMap<String, &'a Customer>,
}

impl<'a> CustomerIndex<'a> {
    pub fn new(customers: &'a [Customer]) -> Self {
        let mut by_email = HashMap::with_capacity(customers.len());

        for customer in customers {
            by_email
                .entry(customer.email.to_lowercase())
                .or_insert(customer);
        }

        Self { by_email }
    }

    pub fn get(&self, email: &str) -> Option<&'a Customer> {
        self.by_email.get(&email.to_lowercase()).copied()
    }
}
