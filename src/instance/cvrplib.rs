//! A minimal reader for the CVRPLIB/Solomon `VEHICLE`/`CUSTOMER` plain-text instance
//! format (§10.1), so benchmark-style instances can be built from a table embedded as
//! a test fixture rather than fetched over the network at test time, the way
//! `pd-tsp-solver` bundles its own CSV fixtures.
//!
//! Parses the capacity out of the `VEHICLE` section and the node table out of the
//! `CUSTOMER` section (`CUST NO. XCOORD. YCOORD. DEMAND READY TIME DUE DATE SERVICE
//! TIME`, row 0 being the depot); distances are Euclidean, rounded to the nearest
//! integer to match this crate's integer-distance instances elsewhere.

use crate::error::InstanceError;
use super::{Instance, Record};

#[derive(Debug, Clone, Copy)]
struct NodeRow {
    x: f64,
    y: f64,
    demand: i64,
    ready: i64,
    due: i64,
    service: i64,
}

/// Parses `text` in CVRPLIB/Solomon format and restricts the result to the depot
/// plus the first `k` customer rows (in table order) — a "prefix" of the full
/// instance, matching the "first k customers" scoping `truncate_to_first_k` also uses.
pub fn read_r101_prefix(text: &str, k: usize) -> Result<Instance, InstanceError> {
    let capacity = parse_capacity(text)?;
    let rows = parse_customer_rows(text)?;

    if rows.is_empty() {
        return Err(InstanceError::LengthMismatch {
            field: "CUSTOMER section",
            expected: 1,
            actual: 0,
        });
    }
    if k > rows.len() - 1 {
        return Err(InstanceError::NotEnoughCustomers {
            requested: k,
            available: rows.len() - 1,
        });
    }

    let depot = rows[0];
    let customer_rows = &rows[1..=k];

    let n = k + 1;
    let mut demands = Vec::with_capacity(n);
    let mut earliest = Vec::with_capacity(n);
    let mut latest = Vec::with_capacity(n);
    let mut service_times = Vec::with_capacity(n);
    let mut coordinates = Vec::with_capacity(n);

    for row in std::iter::once(&depot).chain(customer_rows.iter()) {
        demands.push(row.demand);
        earliest.push(row.ready);
        latest.push(row.due);
        service_times.push(row.service);
        coordinates.push((row.x, row.y));
    }

    let distances = coordinates
        .iter()
        .map(|&(xi, yi)| {
            coordinates
                .iter()
                .map(|&(xj, yj)| (((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt()).round() as i64)
                .collect()
        })
        .collect();

    let record = Record {
        n_customers: k,
        depot: 0,
        customers: (1..=k).collect(),
        capacity,
        demands,
        earliest,
        latest,
        service_times,
        distances,
        coordinates,
    };
    Instance::from_record(record)
}

fn parse_capacity(text: &str) -> Result<i64, InstanceError> {
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        if line.trim() == "VEHICLE" {
            lines.next(); // "NUMBER     CAPACITY" header
            let data_line = lines
                .next()
                .ok_or(InstanceError::LengthMismatch { field: "VEHICLE section", expected: 1, actual: 0 })?;
            let mut fields = data_line.split_whitespace();
            fields.next(); // vehicle count, unused here
            let capacity: i64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or(InstanceError::LengthMismatch { field: "VEHICLE capacity", expected: 1, actual: 0 })?;
            return Ok(capacity);
        }
    }
    Err(InstanceError::LengthMismatch { field: "VEHICLE section", expected: 1, actual: 0 })
}

fn parse_customer_rows(text: &str) -> Result<Vec<NodeRow>, InstanceError> {
    let mut lines = text.lines();
    let mut in_section = false;
    let mut rows = Vec::new();

    for line in &mut lines {
        if line.trim() == "CUSTOMER" {
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("CUST") {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 7 {
            continue;
        }
        let parse = |s: &str| -> Option<f64> { s.parse().ok() };
        let x = parse(fields[1]).ok_or(InstanceError::LengthMismatch { field: "CUSTOMER xcoord", expected: 1, actual: 0 })?;
        let y = parse(fields[2]).ok_or(InstanceError::LengthMismatch { field: "CUSTOMER ycoord", expected: 1, actual: 0 })?;
        rows.push(NodeRow {
            x,
            y,
            demand: fields[3].parse().unwrap_or(0),
            ready: fields[4].parse().unwrap_or(0),
            due: fields[5].parse().unwrap_or(0),
            service: fields[6].parse().unwrap_or(0),
        });
    }
    Ok(rows)
}
