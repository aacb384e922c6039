use std::fs;
use std::path::Path;
use tracing::info;

use crate::constants::{COL_KAMPUS, COL_KOMISARIAT, COL_LK, COL_NAMA, COL_NIK, COL_TAHUN};
use crate::error::Result;
use crate::types::Member;

/// Serialize the filtered view as UTF-8 CSV bytes: the source schema with a
/// 1-based "No" column prepended.
pub fn to_csv_bytes(view: &[&Member]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record([
        "No",
        COL_NIK,
        COL_NAMA,
        COL_KOMISARIAT,
        COL_TAHUN,
        COL_KAMPUS,
        COL_LK[0],
        COL_LK[1],
        COL_LK[2],
    ])?;

    for (idx, member) in view.iter().enumerate() {
        wtr.write_record([
            &(idx + 1).to_string(),
            &member.nik,
            &member.nama,
            &member.komisariat,
            &member.tahun.to_string(),
            &member.kampus,
            &member.lk[0],
            &member.lk[1],
            &member.lk[2],
        ])?;
    }

    wtr.flush()?;
    Ok(wtr.into_inner().expect("in-memory writer cannot fail"))
}

/// Write the filtered view to disk at the given path
pub fn write_csv(view: &[&Member], path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(view)?;
    fs::write(path, &bytes)?;
    info!(path = %path.display(), rows = view.len(), "wrote filtered export");
    Ok(())
}
