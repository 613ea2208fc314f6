//! The fixed demo datasets written to storage on first run.

use crate::{
    customer::{Customer, CustomerKind, CustomerStatus},
    payment::{Payment, PaymentStatus, TransferCharge},
    transfer::{StoredTransfer, TransferDetails, TransferStatus},
};

fn payment(
    id: &str,
    email: &str,
    created_at: &str,
    amount: f64,
    status: PaymentStatus,
    reference: &str,
    origin: &str,
) -> Payment {
    Payment {
        id: id.to_owned(),
        email: email.to_owned(),
        created_at: created_at.to_owned(),
        amount,
        currency: "USD".to_owned(),
        status,
        method: "Cuenta bancaria".to_owned(),
        reference: reference.to_owned(),
        origin: origin.to_owned(),
    }
}

/// Payments into the bank account. The last one is from a payer that is not
/// a customer.
pub fn demo_payments() -> Vec<Payment> {
    vec![
        payment(
            "py_3001",
            "pagos@ferreteriaelsol.com",
            "2026-01-19T10:24:00-05:00",
            1250.5,
            PaymentStatus::Completado,
            "FAC-2026-0113",
            "Portal de pagos",
        ),
        payment(
            "py_3002",
            "contabilidad@cafelaplaza.com",
            "2026-01-18T16:05:00-05:00",
            89.0,
            PaymentStatus::Completado,
            "FAC-2026-0112",
            "Enlace de pago",
        ),
        payment(
            "py_3003",
            "maria.gomez@example.com",
            "2026-01-17T09:12:00-05:00",
            45.99,
            PaymentStatus::Fallido,
            "SUS-88412",
            "Suscripción",
        ),
        payment(
            "py_3004",
            "jose.perez@example.com",
            "2026-01-15T13:40:00-05:00",
            320.0,
            PaymentStatus::Reembolsado,
            "FAC-2026-0098",
            "Portal de pagos",
        ),
        payment(
            "py_3005",
            "compras@distribuidoracaribe.do",
            "2026-01-12T08:30:00-05:00",
            5400.75,
            PaymentStatus::Completado,
            "OC-55120",
            "API",
        ),
        payment(
            "py_3006",
            "visitante@correo.com",
            "2025-12-28T19:55:00-05:00",
            12.3,
            PaymentStatus::Completado,
            "DON-0042",
            "Enlace de pago",
        ),
    ]
}

fn charge(
    id: &str,
    email: &str,
    created_at: &str,
    amount: f64,
    status: PaymentStatus,
    reference: &str,
    origin: &str,
) -> TransferCharge {
    TransferCharge {
        method: "Transferencia".to_owned(),
        ..payment(id, email, created_at, amount, status, reference, origin)
    }
}

/// Charges collected by bank transfer.
pub fn demo_transfer_charges() -> Vec<TransferCharge> {
    vec![
        charge(
            "tc_4001",
            "compras@distribuidoracaribe.do",
            "2026-01-20T11:15:00-05:00",
            2300.0,
            PaymentStatus::Completado,
            "TRF-77310",
            "Banco Popular",
        ),
        charge(
            "tc_4002",
            "pagos@ferreteriaelsol.com",
            "2026-01-16T14:02:00-05:00",
            780.25,
            PaymentStatus::Completado,
            "TRF-77288",
            "Banreservas",
        ),
        charge(
            "tc_4003",
            "jose.perez@example.com",
            "2026-01-10T10:45:00-05:00",
            150.0,
            PaymentStatus::Fallido,
            "TRF-77102",
            "BHD",
        ),
        charge(
            "tc_4004",
            "contabilidad@cafelaplaza.com",
            "2025-12-22",
            64.5,
            PaymentStatus::Reembolsado,
            "TRF-76954",
            "Banco Popular",
        ),
    ]
}

fn customer(
    id: &str,
    name: &str,
    email: &str,
    created_at: &str,
    kind: CustomerKind,
    balance: f64,
    status: CustomerStatus,
) -> Customer {
    Customer {
        id: id.to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
        created_at: created_at.to_owned(),
        kind,
        balance,
        status,
    }
}

pub fn demo_customers() -> Vec<Customer> {
    vec![
        customer(
            "cus_001",
            "Ferretería El Sol",
            "pagos@ferreteriaelsol.com",
            "2025-06-02",
            CustomerKind::Empresa,
            0.0,
            CustomerStatus::Activo,
        ),
        customer(
            "cus_002",
            "Café La Plaza",
            "contabilidad@cafelaplaza.com",
            "2025-08-14",
            CustomerKind::Empresa,
            89.0,
            CustomerStatus::Activo,
        ),
        customer(
            "cus_003",
            "María Gómez",
            "Maria.Gomez@example.com",
            "2025-11-03",
            CustomerKind::Individual,
            45.99,
            CustomerStatus::Moroso,
        ),
        customer(
            "cus_004",
            "José Pérez",
            "jose.perez@example.com",
            "2026-01-05",
            CustomerKind::Individual,
            0.0,
            CustomerStatus::Nuevo,
        ),
        customer(
            "cus_005",
            "Distribuidora Caribe",
            "compras@distribuidoracaribe.do",
            "2024-09-21",
            CustomerKind::Empresa,
            1200.0,
            CustomerStatus::Activo,
        ),
    ]
}

fn transfer(
    id: &str,
    email: Option<&str>,
    amount: f64,
    status: TransferStatus,
    created_at: &str,
    destination: &str,
) -> StoredTransfer {
    StoredTransfer {
        id: id.to_owned(),
        email: email.map(str::to_owned),
        details: TransferDetails {
            amount,
            gross_amount: None,
            net_amount: None,
            currency: "USD".to_owned(),
            status,
            date: None,
            created_at: Some(created_at.to_owned()),
            executed_at: None,
            failed_at: None,
            destination: destination.to_owned(),
            failure_reason: None,
        },
    }
}

/// Outbound transfers. Several are legacy records stored without an e-mail.
pub fn demo_transfers() -> Vec<StoredTransfer> {
    let mut completed = transfer(
        "tr_1001",
        None,
        980.0,
        TransferStatus::Completada,
        "2026-01-19T09:00:00-05:00",
        "Banco Popular ****4521",
    );
    completed.details.gross_amount = Some(1000.0);
    completed.details.net_amount = Some(980.0);
    completed.details.executed_at = Some("2026-01-19T09:02:00-05:00".to_owned());

    let pending = transfer(
        "tr_1002",
        None,
        250.0,
        TransferStatus::Pendiente,
        "2026-01-18T17:30:00-05:00",
        "Banreservas ****1180",
    );

    let processing = transfer(
        "tr_1003",
        Some("compras@distribuidoracaribe.do"),
        4100.0,
        TransferStatus::Procesando,
        "2026-01-20T08:45:00-05:00",
        "BHD ****7734",
    );

    let mut failed = transfer(
        "tr_1004",
        None,
        75.5,
        TransferStatus::Fallida,
        "2026-01-14T12:10:00-05:00",
        "Banco Popular ****0098",
    );
    failed.details.failed_at = Some("2026-01-14T12:11:00-05:00".to_owned());
    failed.details.failure_reason = Some("Cuenta de destino cerrada".to_owned());

    // Only carries the legacy `date` field.
    let mut legacy = transfer(
        "tr_1005",
        None,
        40.0,
        TransferStatus::Completada,
        "2025-12-30",
        "Asociación Popular ****3321",
    );
    legacy.details.date = legacy.details.created_at.take();

    let blank_email = transfer(
        "tr_1006",
        Some(""),
        610.0,
        TransferStatus::Completada,
        "2026-01-08T15:20:00-05:00",
        "Scotiabank ****5567",
    );

    vec![completed, pending, processing, failed, legacy, blank_email]
}

#[cfg(test)]
mod tests {
    use crate::customer::CustomerIndex;

    use super::{demo_customers, demo_payments, demo_transfers};

    #[test]
    fn there_are_six_demo_payments() {
        assert_eq!(demo_payments().len(), 6);
    }

    #[test]
    fn some_payment_has_no_customer() {
        let customers = demo_customers();
        let index = CustomerIndex::new(&customers);

        assert!(
            demo_payments()
                .iter()
                .any(|payment| index.get(&payment.email).is_none())
        );
    }

    #[test]
    fn some_transfers_lack_an_email() {
        assert!(
            demo_transfers()
                .iter()
                .any(|transfer| transfer.email.is_none())
        );
    }
}
