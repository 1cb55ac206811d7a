use chrono::{Days, NaiveDate};
use rand::{Rng, RngCore};
use uuid::Uuid;

use hrseed_plan::{PositionTemplate, SeedPlan};

use crate::errors::{GenerationError, Result};

/// Read-only source of names, documents, and catalogs for the entity
/// generator. Every draw comes from the caller's RNG.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceData<'a> {
    plan: &'a SeedPlan,
}

impl<'a> ReferenceData<'a> {
    pub fn new(plan: &'a SeedPlan) -> Result<Self> {
        for (pool, names) in [("first", &plan.names.first), ("last", &plan.names.last)] {
            if names.is_empty() {
                return Err(GenerationError::Configuration(format!(
                    "{pool} name pool must not be empty"
                )));
            }
            if let Some(idx) = names.iter().position(|name| fold_ascii(name).is_empty()) {
                return Err(GenerationError::Configuration(format!(
                    "{pool} name {idx} ({:?}) has no letters usable in an e-mail",
                    names[idx]
                )));
            }
        }
        Ok(Self { plan })
    }

    /// Uniform draw of a first and a last name.
    pub fn next_name<R: Rng>(&self, rng: &mut R) -> (&'a str, &'a str) {
        let first = pick(&self.plan.names.first, rng).as_str();
        let last = pick(&self.plan.names.last, rng).as_str();
        (first, last)
    }

    pub fn next_first_name<R: Rng>(&self, rng: &mut R) -> &'a str {
        pick(&self.plan.names.first, rng).as_str()
    }

    /// Eleven-digit CPF with valid check digits.
    pub fn next_document_id<R: Rng>(&self, rng: &mut R) -> String {
        let mut digits = [0_u8; 11];
        for digit in digits.iter_mut().take(9) {
            *digit = rng.random_range(0..=9);
        }
        digits[9] = cpf_check_digit(&digits[..9]);
        digits[10] = cpf_check_digit(&digits[..10]);
        digits.iter().map(|d| char::from(b'0' + *d)).collect()
    }

    /// Position templates for a department, falling back to the default
    /// catalog.
    pub fn position_catalog(&self, department_code: &str) -> Result<&'a [PositionTemplate]> {
        match self.plan.positions_for(department_code) {
            Some(positions) if !positions.is_empty() => Ok(positions),
            _ => Err(GenerationError::Configuration(format!(
                "department '{department_code}' has zero positions"
            ))),
        }
    }

    /// `first.last@domain`; `attempt > 0` appends a numeric suffix.
    pub fn email_for(&self, first: &str, last: &str, attempt: u32) -> String {
        let local = format!("{}.{}", fold_ascii(first), fold_ascii(last));
        let domain = &self.plan.tenant.email_domain;
        if attempt == 0 {
            format!("{local}@{domain}")
        } else {
            format!("{local}{}@{domain}", attempt + 1)
        }
    }
}

/// Pick uniformly from a non-empty pool.
pub fn pick<'a, T, R: Rng>(values: &'a [T], rng: &mut R) -> &'a T {
    &values[rng.random_range(0..values.len())]
}

/// Version 4 UUID built from RNG bytes, so ids follow the seed.
pub fn random_uuid<R: RngCore>(rng: &mut R) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Uniform date in `[start, end]`.
pub fn date_between<R: Rng>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0) as u64;
    start
        .checked_add_days(Days::new(rng.random_range(0..=span)))
        .unwrap_or(start)
}

/// Uniform date within the given calendar years, inclusive.
pub fn date_in_years<R: Rng>(rng: &mut R, from_year: i32, to_year: i32) -> NaiveDate {
    let start = NaiveDate::from_ymd_opt(from_year, 1, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(to_year, 12, 31).unwrap_or(start);
    date_between(rng, start, end)
}

/// True when the last two digits are the CPF check digits of the first nine.
pub fn is_valid_cpf(value: &str) -> bool {
    if value.len() != 11 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u8> = value.bytes().map(|b| b - b'0').collect();
    digits[9] == cpf_check_digit(&digits[..9]) && digits[10] == cpf_check_digit(&digits[..10])
}

fn cpf_check_digit(digits: &[u8]) -> u8 {
    let mut sum = 0_u32;
    let mut weight = digits.len() as u32 + 1;
    for digit in digits {
        sum += u32::from(*digit) * weight;
        weight = weight.saturating_sub(1);
    }
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

/// Lowercase ASCII slug of a name: accents dropped, separators removed.
fn fold_ascii(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn cpf_check_digits_are_valid() {
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("52998224724"));
        assert!(!is_valid_cpf("5299822472"));

        let plan = hrseed_plan::default_plan().expect("default plan").plan;
        let reference = ReferenceData::new(&plan).expect("reference data");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let cpf = reference.next_document_id(&mut rng);
            assert!(is_valid_cpf(&cpf), "{cpf}");
        }
    }

    #[test]
    fn emails_fold_accents_and_suffix_collisions() {
        let plan = hrseed_plan::default_plan().expect("default plan").plan;
        let reference = ReferenceData::new(&plan).expect("reference data");
        assert_eq!(
            reference.email_for("João", "Conceição", 0),
            "joao.conceicao@axonrh.com.br"
        );
        assert_eq!(
            reference.email_for("Ana", "Silva", 2),
            "ana.silva3@axonrh.com.br"
        );
    }

    #[test]
    fn blank_or_letterless_names_are_rejected() {
        let mut plan = hrseed_plan::default_plan().expect("default plan").plan;
        plan.names.last = vec!["Oliveira".to_string(), "  ".to_string()];
        let err = ReferenceData::new(&plan).expect_err("blank last name");
        assert!(matches!(err, GenerationError::Configuration(_)));

        plan.names.last = vec!["Oliveira".to_string()];
        plan.names.first = vec!["--".to_string()];
        let err = ReferenceData::new(&plan).expect_err("letterless first name");
        assert!(matches!(err, GenerationError::Configuration(_)));

        plan.names.first = vec!["Ana".to_string()];
        let reference = ReferenceData::new(&plan).expect("reference data");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(reference.next_name(&mut rng), ("Ana", "Oliveira"));
        assert_eq!(reference.next_first_name(&mut rng), "Ana");
    }

    #[test]
    fn uuids_follow_the_rng() {
        let mut a = ChaCha8Rng::seed_from_u64(1);
        let mut b = ChaCha8Rng::seed_from_u64(1);
        let id = random_uuid(&mut a);
        assert_eq!(id, random_uuid(&mut b));
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn dates_stay_inside_their_years() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let date = date_in_years(&mut rng, 2005, 2022);
            assert!((2005..=2022).contains(&chrono::Datelike::year(&date)));
        }
    }
}
