/// Column name constants to ensure consistency across the codebase.
/// These match the headers of the bundled dataset and any uploaded CSV.

pub const COL_NIK: &str = "NIK";
pub const COL_NAMA: &str = "Nama";
pub const COL_KOMISARIAT: &str = "Asal Komisariat";
pub const COL_TAHUN: &str = "Tahun Kaderisasi";
pub const COL_KAMPUS: &str = "Kampus";
pub const COL_LK: [&str; 3] = ["LK 1", "LK 2", "LK 3"];

// Recognized training-stage status values
pub const STATUS_SELESAI: &str = "Selesai";
pub const STATUS_BELUM: &str = "Belum";

/// Sentinel permitted-campus value for labels whose campus was never
/// observed; disables the campus-consistency check for that label.
pub const UNKNOWN_CAMPUS: &str = "(unknown)";

/// "all units" selector value shown in the CLI
pub const SEMUA: &str = "Semua";

/// Fixed file name for the filtered CSV export
pub const EXPORT_FILE_NAME: &str = "kaders_hmi_ciputat_filtered.csv";

/// Path of the bundled default dataset, relative to the working directory
pub const DEFAULT_DATASET: &str = "data/kaders_hmi_ciputat.csv";

/// Seed komisariat → permitted kampus table. The mapping may be extended at
/// load time with labels discovered in the input, never overwritten.
pub const SEED_MAPPING: &[(&str, &[&str])] = &[
    ("Komfakdisa", &["UIN"]),
    ("Komfaksy", &["UIN"]),
    ("Komtar", &["UIN"]),
    ("Komfakda", &["UIN"]),
    ("Komfastek", &["UIN"]),
    ("Kafeis", &["UIN"]),
    ("Kofah", &["UIN"]),
    ("Komfakdik", &["UIN"]),
    ("Kompsi", &["UIN"]),
    ("Kolega", &["STIE GANESHA"]),
    ("Komipam", &["UNPAM"]),
    ("Komfaktek", &["UNPAM"]),
    ("Komfisip", &["UIN"]),
    ("kotaro", &["STAN"]),
    ("Komfatma", &["STAI MULA SADRA"]),
    ("Komici", &["UMJ"]),
];

/// Columns the validator requires before any other check runs
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![COL_NIK, COL_NAMA, COL_KOMISARIAT, COL_TAHUN, COL_KAMPUS];
    cols.extend(COL_LK);
    cols
}
