//! On-disk layout of the cache file.

/// Header row, in file order. Any other header is a corrupt cache.
pub const COLUMNS: [&str; 7] = [
  "num_departement",
  "mois",
  "annee",
  "fait",
  "nombre",
  "population",
  "nom_departement",
];

pub const DELIMITER: u8 = b';';
