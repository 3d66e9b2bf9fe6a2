//! Random discrete choice datasets for tests and benchmarks.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::table::Table;

/// Smallest number of alternatives given to a generated person.
pub const MIN_ALTERNATIVES: usize = 3;
/// Largest number of alternatives given to a generated person.
pub const MAX_ALTERNATIVES: usize = 7;

/// Raw tables for a generated population, ready for
/// [`DcmTable::init`](crate::DcmTable::init).
#[derive(Clone, Debug)]
pub struct RandomDataset {
    /// One row per (person, alternative) pair.
    pub attributes: Table,
    /// 1-based chosen alternative per person.
    pub decisions: Table,
    /// Number of alternatives per person.
    pub num_alternatives: Table,
}

/// Generates `num_people` people, each with between [`MIN_ALTERNATIVES`] and
/// [`MAX_ALTERNATIVES`] alternatives whose attributes are uniform on
/// `[0.1, 1.0)`, and a uniformly chosen decision.
pub fn random_dataset<R: Rng + ?Sized>(
    num_people: usize,
    num_attributes: usize,
    rng: &mut R,
) -> RandomDataset {
    let alternative_counts: Vec<usize> = (0..num_people)
        .map(|_| rng.gen_range(MIN_ALTERNATIVES..=MAX_ALTERNATIVES))
        .collect();
    let total: usize = alternative_counts.iter().sum();

    let attribute_values = Uniform::new(0.1, 1.0);
    let values: Vec<f64> = (0..total * num_attributes)
        .map(|_| attribute_values.sample(rng))
        .collect();
    let attributes = Table::from_matrix(nalgebra::DMatrix::from_vec(
        num_attributes,
        total,
        values,
    ));

    let decisions: Vec<f64> = alternative_counts
        .iter()
        .map(|&count| rng.gen_range(1..=count) as f64)
        .collect();
    let counts: Vec<f64> = alternative_counts.iter().map(|&count| count as f64).collect();

    RandomDataset {
        attributes,
        decisions: Table::from_column(&decisions),
        num_alternatives: Table::from_column(&counts),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn generated_tables_are_consistent() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let dataset = random_dataset(50, 4, &mut rng);

        assert_eq!(dataset.decisions.n_entries(), 50);
        assert_eq!(dataset.num_alternatives.n_entries(), 50);
        assert_eq!(dataset.attributes.n_attributes(), 4);

        let mut total = 0usize;
        for person in 0..50 {
            let count = dataset.num_alternatives.get(person)[0] as usize;
            let decision = dataset.decisions.get(person)[0] as usize;
            assert!((MIN_ALTERNATIVES..=MAX_ALTERNATIVES).contains(&count));
            assert!((1..=count).contains(&decision));
            total += count;
        }
        assert_eq!(dataset.attributes.n_entries(), total);
        assert!(dataset
            .attributes
            .data()
            .iter()
            .all(|value| (0.1..1.0).contains(value)));
    }
}
