//! Ledger schema.
//!
//! Creates the chart of accounts, entry headers and entry lines, with the
//! double-entry checks enforced by the database as well as by the store.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(TRANSACTION_ENTRIES_SQL).await?;
        db.execute_unprepared(ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'income',
    'expense'
);

CREATE TYPE transaction_source AS ENUM (
    'payment',
    'advance_payment',
    'expense_payment',
    'vendor_payment',
    'petty_cash',
    'refund',
    'rental_accrual',
    'expense_accrual',
    'invoice',
    'manual',
    'adjustment',
    'reversal',
    'other'
);

CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'voided');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    category VARCHAR(100),
    parent_code VARCHAR(64),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_parent_not_self CHECK (parent_code IS NULL OR parent_code <> code)
);

CREATE INDEX idx_accounts_type ON accounts(account_type);
CREATE INDEX idx_accounts_parent ON accounts(parent_code) WHERE parent_code IS NOT NULL;
";

const TRANSACTION_ENTRIES_SQL: &str = r"
CREATE TABLE transaction_entries (
    id UUID PRIMARY KEY,
    transaction_id VARCHAR(64) NOT NULL
        CONSTRAINT transaction_entries_transaction_id_key UNIQUE,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    source transaction_source NOT NULL,
    source_id VARCHAR(100),
    residence_id UUID,
    student_id UUID,
    status entry_status NOT NULL DEFAULT 'posted',
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_entries_date ON transaction_entries(entry_date) WHERE status = 'posted';
CREATE INDEX idx_entries_residence_date ON transaction_entries(residence_id, entry_date)
    WHERE status = 'posted';
CREATE INDEX idx_entries_source ON transaction_entries(source);
";

const ENTRY_LINES_SQL: &str = r"
CREATE TABLE entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES transaction_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_code VARCHAR(64) NOT NULL,
    account_name VARCHAR(255) NOT NULL DEFAULT '',
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description TEXT,
    UNIQUE (entry_id, line_no),
    CONSTRAINT chk_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    )
);

CREATE INDEX idx_lines_entry ON entry_lines(entry_id);
CREATE INDEX idx_lines_account ON entry_lines(account_code);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_entry_balance
-- Debits must equal credits for every entry at commit time
-- ============================================================
CREATE OR REPLACE FUNCTION check_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    total_debit NUMERIC(19, 4);
    total_credit NUMERIC(19, 4);
BEGIN
    SELECT
        COALESCE(SUM(debit), 0),
        COALESCE(SUM(credit), 0)
    INTO total_debit, total_credit
    FROM entry_lines
    WHERE entry_id = NEW.entry_id;

    IF total_debit <> total_credit THEN
        RAISE EXCEPTION 'Entry is not balanced. Debit: %, Credit: %',
            total_debit, total_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER INSERT OR UPDATE ON entry_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_entry_balance();

-- ============================================================
-- FUNCTION: prevent_line_changes
-- The ledger is append-only: lines are never edited after insert
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_line_changes()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Entry lines are immutable';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_line_update
BEFORE UPDATE ON entry_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_line_changes();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_prevent_line_update ON entry_lines;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON entry_lines;

DROP FUNCTION IF EXISTS prevent_line_changes();
DROP FUNCTION IF EXISTS check_entry_balance();

DROP TABLE IF EXISTS entry_lines;
DROP TABLE IF EXISTS transaction_entries;
DROP TABLE IF EXISTS accounts;

DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS transaction_source;
DROP TYPE IF EXISTS account_type;
";
