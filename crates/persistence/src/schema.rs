// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS organizations (
            organization_id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0 CHECK(is_deleted IN (0, 1))
        );

        CREATE TABLE IF NOT EXISTS roles (
            role_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE')),
            is_system_role INTEGER NOT NULL DEFAULT 0 CHECK(is_system_role IN (0, 1)),
            permissions_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            organization_id INTEGER NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE', 'LOCKED')),
            failed_login_attempts INTEGER NOT NULL DEFAULT 0,
            locked_until TEXT,
            FOREIGN KEY(organization_id) REFERENCES organizations(organization_id)
        );

        CREATE TABLE IF NOT EXISTS sessions (
            session_id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_token TEXT NOT NULL UNIQUE,
            user_id INTEGER NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            expires_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_token
            ON sessions(session_token);

        CREATE TABLE IF NOT EXISTS farmers (
            farmer_id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            id_number TEXT NOT NULL UNIQUE,
            phone_number TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE')),
            updated_at TEXT NOT NULL,
            FOREIGN KEY(organization_id) REFERENCES organizations(organization_id)
        );

        CREATE INDEX IF NOT EXISTS idx_farmers_org_updated
            ON farmers(organization_id, updated_at);

        CREATE TABLE IF NOT EXISTS farms (
            farm_id INTEGER PRIMARY KEY AUTOINCREMENT,
            farmer_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            size INTEGER NOT NULL,
            unit_of_measure TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE')),
            updated_at TEXT NOT NULL,
            FOREIGN KEY(farmer_id) REFERENCES farmers(farmer_id)
        );

        CREATE TABLE IF NOT EXISTS insurance_products (
            product_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE'))
        );

        CREATE TABLE IF NOT EXISTS loss_assessors (
            assessor_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            organization_id INTEGER NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE')),
            FOREIGN KEY(user_id) REFERENCES users(user_id),
            FOREIGN KEY(organization_id) REFERENCES organizations(organization_id)
        );

        CREATE TABLE IF NOT EXISTS quotations (
            quotation_id INTEGER PRIMARY KEY AUTOINCREMENT,
            farmer_id INTEGER NOT NULL,
            farm_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            policy_number TEXT UNIQUE,
            premium_amount INTEGER NOT NULL,
            sum_insured INTEGER NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('OPEN', 'PAID', 'WRITTEN')),
            payment_date TEXT,
            payment_reference TEXT,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(farmer_id) REFERENCES farmers(farmer_id),
            FOREIGN KEY(farm_id) REFERENCES farms(farm_id),
            FOREIGN KEY(product_id) REFERENCES insurance_products(product_id)
        );

        CREATE INDEX IF NOT EXISTS idx_quotations_farmer
            ON quotations(farmer_id);

        CREATE TABLE IF NOT EXISTS claims (
            claim_id INTEGER PRIMARY KEY AUTOINCREMENT,
            farmer_id INTEGER NOT NULL,
            quotation_id INTEGER NOT NULL,
            loss_assessor_id INTEGER,
            claim_number TEXT NOT NULL UNIQUE,
            estimated_loss_amount INTEGER NOT NULL,
            approved_amount INTEGER,
            status TEXT NOT NULL CHECK(status IN
                ('OPEN', 'UNDER_ASSESSMENT', 'PENDING_PAYMENT', 'PAID', 'REJECTED')),
            approval_date TEXT,
            loss_details_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(farmer_id) REFERENCES farmers(farmer_id),
            FOREIGN KEY(quotation_id) REFERENCES quotations(quotation_id),
            FOREIGN KEY(loss_assessor_id) REFERENCES loss_assessors(assessor_id)
        );

        CREATE INDEX IF NOT EXISTS idx_claims_number
            ON claims(claim_number);

        CREATE TABLE IF NOT EXISTS claim_assignments (
            assignment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            claim_id INTEGER NOT NULL,
            loss_assessor_id INTEGER NOT NULL,
            assigned_by INTEGER NOT NULL,
            assignment_date TEXT NOT NULL,
            FOREIGN KEY(claim_id) REFERENCES claims(claim_id),
            FOREIGN KEY(loss_assessor_id) REFERENCES loss_assessors(assessor_id),
            FOREIGN KEY(assigned_by) REFERENCES users(user_id)
        );

        CREATE TABLE IF NOT EXISTS subsidies (
            subsidy_id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            rate_basis_points INTEGER NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('ACTIVE', 'INACTIVE')),
            FOREIGN KEY(organization_id) REFERENCES organizations(organization_id)
        );

        CREATE TABLE IF NOT EXISTS invoices (
            invoice_id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            subsidy_id INTEGER NOT NULL,
            invoice_number TEXT NOT NULL UNIQUE,
            amount INTEGER NOT NULL,
            status TEXT NOT NULL CHECK(status IN
                ('PENDING', 'APPROVED', 'SETTLED', 'REJECTED')),
            approved_date TEXT,
            settlement_date TEXT,
            payment_reference TEXT,
            rejection_reason TEXT,
            FOREIGN KEY(organization_id) REFERENCES organizations(organization_id),
            FOREIGN KEY(subsidy_id) REFERENCES subsidies(subsidy_id)
        );

        CREATE INDEX IF NOT EXISTS idx_invoices_status
            ON invoices(status);

        CREATE TABLE IF NOT EXISTS notifications (
            notification_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0 CHECK(is_read IN (0, 1)),
            read_at TEXT,
            FOREIGN KEY(user_id) REFERENCES users(user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, is_read);
        ",
    )?;

    Ok(())
}
