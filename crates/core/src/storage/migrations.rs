//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            CREATE TABLE IF NOT EXISTS establishments (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                postal_code TEXT NOT NULL,
                city TEXT NOT NULL,
                phone TEXT,
                email TEXT,
                website TEXT,
                manager TEXT,
                manager_phone TEXT,
                manager_email TEXT,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                kind TEXT NOT NULL DEFAULT 'hotel',
                total_rooms INTEGER NOT NULL DEFAULT 0,
                occupied_rooms INTEGER NOT NULL DEFAULT 0,
                -- Denormalized, rewritten with every room count change
                occupancy_rate INTEGER NOT NULL DEFAULT 0,
                siret TEXT,
                vat_number TEXT,
                star_rating INTEGER,
                description TEXT,
                check_in_time TEXT,
                check_out_time TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS room_categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                capacity INTEGER NOT NULL DEFAULT 1,
                surface_area REAL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                establishment_id TEXT NOT NULL,
                category_id TEXT,
                number TEXT NOT NULL,
                kind TEXT NOT NULL,
                price REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'available',
                floor INTEGER,
                size REAL,
                description TEXT,
                bed_type TEXT,
                view TEXT,
                -- JSON arrays; entries may be strings or {name}/{value} objects
                amenities TEXT NOT NULL DEFAULT '[]',
                images TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (establishment_id) REFERENCES establishments(id) ON DELETE CASCADE,
                FOREIGN KEY (category_id) REFERENCES room_categories(id) ON DELETE SET NULL,
                UNIQUE(establishment_id, number)
            );

            CREATE TABLE IF NOT EXISTS equipment (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'general',
                description TEXT,
                icon TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                display_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS hotel_equipment (
                id TEXT PRIMARY KEY,
                establishment_id TEXT NOT NULL,
                equipment_id TEXT NOT NULL,
                is_available INTEGER NOT NULL DEFAULT 1,
                is_free INTEGER NOT NULL DEFAULT 1,
                surcharge REAL,
                specific_description TEXT,
                usage_conditions TEXT,
                internal_notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (establishment_id) REFERENCES establishments(id) ON DELETE CASCADE,
                FOREIGN KEY (equipment_id) REFERENCES equipment(id) ON DELETE CASCADE,
                UNIQUE(establishment_id, equipment_id)
            );

            CREATE TABLE IF NOT EXISTS maintenance_tasks (
                id TEXT PRIMARY KEY,
                establishment_id TEXT NOT NULL,
                room_id TEXT,
                title TEXT NOT NULL,
                description TEXT,
                priority TEXT NOT NULL DEFAULT 'medium',
                assignee TEXT,
                due_date TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                notes TEXT,
                completed_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (establishment_id) REFERENCES establishments(id) ON DELETE CASCADE,
                FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE SET NULL
            );

            CREATE TABLE IF NOT EXISTS conventions (
                id TEXT PRIMARY KEY,
                client_name TEXT NOT NULL,
                category_id TEXT NOT NULL,
                establishment_id TEXT,
                starts_on TEXT NOT NULL,
                ends_on TEXT,
                default_price REAL NOT NULL,
                -- JSON object: month key -> price
                monthly_prices TEXT NOT NULL DEFAULT '{}',
                discount_percent REAL,
                monthly_flat_rate REAL,
                conditions TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (category_id) REFERENCES room_categories(id) ON DELETE CASCADE,
                FOREIGN KEY (establishment_id) REFERENCES establishments(id) ON DELETE SET NULL
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for list filters",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_establishments_status ON establishments(status);
            CREATE INDEX IF NOT EXISTS idx_establishments_city ON establishments(city);

            CREATE INDEX IF NOT EXISTS idx_rooms_establishment ON rooms(establishment_id);
            CREATE INDEX IF NOT EXISTS idx_rooms_establishment_status ON rooms(establishment_id, status);

            CREATE INDEX IF NOT EXISTS idx_hotel_equipment_establishment ON hotel_equipment(establishment_id);

            CREATE INDEX IF NOT EXISTS idx_tasks_establishment ON maintenance_tasks(establishment_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_status ON maintenance_tasks(status);

            CREATE INDEX IF NOT EXISTS idx_conventions_client_category ON conventions(client_name, category_id);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}

/// Latest version known to this build
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
