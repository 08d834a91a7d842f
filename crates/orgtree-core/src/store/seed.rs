//! Schema and the fixed seed dataset.
//!
//! The script is written in the SQL subset shared by SQLite and Postgres:
//! `CREATE TABLE IF NOT EXISTS` plus `INSERT ... ON CONFLICT DO NOTHING`, so
//! applying it any number of times leaves the relations unchanged.

use crate::error::Result;
use crate::types::{Employee, Position};

use super::EdgeStore;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name VARCHAR(50),
    position INTEGER,
    bossid INTEGER
);

CREATE TABLE IF NOT EXISTS positions (
    id INTEGER PRIMARY KEY,
    position VARCHAR(50)
);
";

const POSITIONS: &[(i64, &str)] = &[
    (1, "Региональный директор"),
    (2, "Территориальный менеджер"),
    (3, "Супервайзер"),
];

const EMPLOYEES: &[(i64, &str, i64, i64)] = &[
    (1, "Дмитрий Иванов", 1, 0),
    (2, "Сергей Крылов", 2, 1),
    (3, "Иван Старшов", 2, 10),
    (4, "Руслан Ивлев", 3, 2),
    (5, "Ирина Кортнева", 3, 2),
    (6, "Елизавета Зайцева", 3, 8),
    (7, "Адрей Петров", 3, 9),
    (8, "Анна Миронова", 2, 10),
    (9, "Владимир Павлов", 2, 10),
    (10, "Константин Ли", 1, 0),
];

pub fn positions() -> Vec<Position> {
    POSITIONS
        .iter()
        .map(|&(id, label)| Position::new(id, label))
        .collect()
}

pub fn employees() -> Vec<Employee> {
    EMPLOYEES
        .iter()
        .map(|&(id, name, position, boss)| Employee::new(id, name, position, boss))
        .collect()
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Full DDL + DML script for the given dataset.
pub fn script_for(employees: &[Employee], positions: &[Position]) -> String {
    let mut out = String::from(SCHEMA);

    if !employees.is_empty() {
        let values: Vec<String> = employees
            .iter()
            .map(|e| {
                format!(
                    "({}, {}, {}, {})",
                    e.id,
                    quote(&e.name),
                    e.position,
                    e.boss_id
                )
            })
            .collect();
        out.push_str("\nINSERT INTO employees (id, name, position, bossid)\nVALUES ");
        out.push_str(&values.join(",\n       "));
        out.push_str("\nON CONFLICT DO NOTHING;\n");
    }

    if !positions.is_empty() {
        let values: Vec<String> = positions
            .iter()
            .map(|p| format!("({}, {})", p.id, quote(&p.label)))
            .collect();
        out.push_str("\nINSERT INTO positions (id, position)\nVALUES ");
        out.push_str(&values.join(",\n       "));
        out.push_str("\nON CONFLICT DO NOTHING;\n");
    }

    out
}

pub fn script() -> String {
    script_for(&employees(), &positions())
}

/// Create both relations and insert the seed rows, skipping rows whose id
/// already exists.
pub fn apply(store: &dyn EdgeStore) -> Result<()> {
    apply_dataset(store, &employees(), &positions())
}

pub fn apply_dataset(
    store: &dyn EdgeStore,
    employees: &[Employee],
    positions: &[Position],
) -> Result<()> {
    store.execute(&script_for(employees, positions))?;
    tracing::info!(
        backend = %store.backend(),
        employees = employees.len(),
        positions = positions.len(),
        "schema and seed applied"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_two_roots() {
        let roots: Vec<i64> = employees()
            .iter()
            .filter(|e| e.is_root())
            .map(|e| e.id)
            .collect();
        assert_eq!(roots, vec![1, 10]);
    }

    #[test]
    fn every_seed_employee_has_a_position() {
        let ids: Vec<i64> = positions().iter().map(|p| p.id).collect();
        assert!(employees().iter().all(|e| ids.contains(&e.position)));
    }

    #[test]
    fn script_is_conflict_tolerant() {
        let s = script();
        assert!(s.contains("CREATE TABLE IF NOT EXISTS employees"));
        assert!(s.contains("CREATE TABLE IF NOT EXISTS positions"));
        assert_eq!(s.matches("ON CONFLICT DO NOTHING").count(), 2);
        assert!(s.contains("(7, 'Адрей Петров', 3, 9)"));
    }

    #[test]
    fn quotes_are_escaped() {
        let s = script_for(&[Employee::new(1, "Conan O'Brien", 1, 0)], &[]);
        assert!(s.contains("'Conan O''Brien'"));
        assert!(!s.contains("INSERT INTO positions"));
    }
}
