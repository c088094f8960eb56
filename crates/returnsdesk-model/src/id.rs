use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of random-suffix candidates tried after the first collision.
pub const MAX_ID_ATTEMPTS: usize = 10;

const SLUG_MAX_CHARS: usize = 12;
const SUFFIX_LEN: usize = 3;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn slug_separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"\s+|/|&").expect("invalid regex"))
}

/// Builds the brand part of an identifier.
///
/// Runs of whitespace and every `/` or `&` become `_`, then the result is cut
/// to 12 characters. Returns `None` for a blank brand.
pub fn brand_slug(brand: &str) -> Option<String> {
    if brand.trim().is_empty() {
        return None;
    }
    let replaced = slug_separators().replace_all(brand, "_");
    Some(replaced.chars().take(SLUG_MAX_CHARS).collect())
}

/// Generates report identifiers of the form `R-{YYYYMMDD}-{HHMMSS}[-{brandSlug}]`.
///
/// When the first candidate is taken, up to [`MAX_ID_ATTEMPTS`] candidates
/// with a random three-character base-36 suffix are tried. If all of them
/// are taken too, the last candidate is returned anyway: uniqueness is
/// best-effort, not guaranteed.
pub struct IdGenerator {
    rng: Box<dyn RngCore + Send>,
}

impl IdGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a generator drawing suffixes from `rng`.
    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Generates an identifier for `now`, avoiding ids for which `is_taken`
    /// returns true.
    pub fn generate<F>(&mut self, now: NaiveDateTime, brand: &str, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let date = now.format("%Y%m%d");
        let time = now.format("%H%M%S");
        let mut id = match brand_slug(brand) {
            Some(slug) => format!("R-{}-{}-{}", date, time, slug),
            None => format!("R-{}-{}", date, time),
        };

        let mut attempts = 0;
        while is_taken(&id) && attempts < MAX_ID_ATTEMPTS {
            id = format!("R-{}-{}-{}", date, time, self.suffix());
            attempts += 1;
        }
        id
    }

    fn suffix(&mut self) -> String {
        (0..SUFFIX_LEN)
            .map(|_| BASE36[self.rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
