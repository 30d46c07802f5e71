//! Random candidate lists for trying the map without real election data.

use std::io::Write;

use rand::{Rng, seq::IndexedRandom};

use crate::party::PartyColors;

pub const MIN_CANDIDATES: usize = 2;
pub const MAX_CANDIDATES: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DummyRow {
    pub district: String,
    pub candidate: String,
    pub party: String,
    pub color: String,
}

/// 2–5 candidates per district, each from a different party.
pub fn generate<R: Rng>(names: &[String], colors: &PartyColors, rng: &mut R) -> Vec<DummyRow> {
    let parties: Vec<(&str, &str)> = colors.iter().collect();
    let mut rows = Vec::new();

    for name in names {
        let count = rng.random_range(MIN_CANDIDATES..=MAX_CANDIDATES).min(parties.len());
        for (i, (party, color)) in parties.choose_multiple(rng, count).enumerate() {
            rows.push(DummyRow {
                district: name.clone(),
                candidate: candidate_label(i),
                party: party.to_string(),
                color: color.to_string(),
            });
        }
    }
    rows
}

/// `候補者A`, `候補者B`, …
fn candidate_label(i: usize) -> String {
    let letter = char::from(b'A' + (i % 26) as u8);
    format!("候補者{letter}")
}

/// Writes rows with the same header the candidate loader expects.
pub fn write_csv<W: Write>(rows: &[DummyRow], district_column: &str, out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([district_column, "candidate_name", "party", "color"])?;
    for row in rows {
        wtr.write_record([&row.district, &row.candidate, &row.party, &row.color])?;
    }
    wtr.flush()?;
    Ok(())
}
