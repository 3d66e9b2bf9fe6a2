use std::collections::HashSet;

use approx::assert_relative_eq;
use mixlogit::distribution::{DiagonalGaussianDistribution, GaussianDistribution};
use mixlogit::random::random_dataset;
use mixlogit::{DcmError, DcmTable, Table};
use nalgebra::DVector;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_table(seed: u64, num_people: usize) -> DcmTable<DiagonalGaussianDistribution> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let dataset = random_dataset(num_people, 3, &mut rng);
    DcmTable::init(
        dataset.attributes,
        &[2, 1],
        dataset.decisions,
        dataset.num_alternatives,
        DiagonalGaussianDistribution::default(),
        &mut rng,
    )
    .unwrap()
}

/// The worked two-person example: scores `[1, 0]` and `[1, 0, 2]` under `beta = [1, 0]`.
#[test]
fn two_person_scenario_matches_closed_form() {
    let attributes =
        Table::from_points(2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 2.0, 0.0]).unwrap();
    let decisions = Table::from_column(&[1.0, 3.0]);
    let num_alternatives = Table::from_column(&[2.0, 3.0]);
    let mut rng = SmallRng::seed_from_u64(7);
    let table = DcmTable::init(
        attributes,
        &[2],
        decisions,
        num_alternatives,
        GaussianDistribution::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(table.num_parameters(), 2 + 3);

    let beta = DVector::from_vec(vec![1.0, 0.0]);
    let e = std::f64::consts::E;

    let first = table.choice_probabilities(0, &beta);
    assert_relative_eq!(
        first,
        DVector::from_vec(vec![e / (e + 1.0), 1.0 / (e + 1.0)]),
        epsilon = 1e-12
    );
    assert_relative_eq!(table.choice_probability(0, &beta), e / (e + 1.0), epsilon = 1e-12);

    let second = table.choice_probabilities(1, &beta);
    let z = 1.0 + e.powi(-1) + e;
    assert_relative_eq!(
        second,
        DVector::from_vec(vec![1.0 / z, e.powi(-1) / z, e / z]),
        epsilon = 1e-12
    );
    let chosen = table.choice_probability(1, &beta);
    assert!(second.iter().all(|&p| p <= chosen));
}

#[test]
fn probabilities_sum_to_one_for_every_person() {
    let table = random_table(17, 200);
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..10 {
        let beta = DVector::from_fn(table.num_attributes(), |_, _| rng.gen_range(-25.0..25.0));
        for person in 0..table.num_people() {
            let probabilities = table.choice_probabilities(person, &beta);
            assert_eq!(probabilities.len(), table.num_discrete_choices(person));
            assert!(probabilities.iter().all(|&p| p >= 0.0));
            assert_relative_eq!(probabilities.sum(), 1.0, epsilon = 1e-9);
            assert_eq!(
                table.choice_probability(person, &beta),
                probabilities[table.chosen_index(person)]
            );
        }
    }
}

#[test]
fn offsets_tile_the_attribute_table() {
    let table = random_table(5, 120);
    for person in 0..table.num_people() - 1 {
        assert_eq!(
            table.cumulative_offset(person) + table.num_discrete_choices(person),
            table.cumulative_offset(person + 1)
        );
    }
    let last = table.num_people() - 1;
    assert_eq!(
        table.cumulative_offset(last) + table.num_discrete_choices(last),
        table.total_num_discrete_choices()
    );
}

#[test]
fn shuffled_order_is_a_permutation() {
    let table = random_table(23, 300);
    let visited: HashSet<usize> = (0..table.num_people())
        .map(|pos| table.shuffled_index_for_person(pos))
        .collect();
    assert_eq!(visited, (0..table.num_people()).collect::<HashSet<_>>());
}

#[test]
fn per_choice_counts_cover_every_person() {
    let table = random_table(31, 250);
    let counted: usize = (0..table.max_num_discrete_choices())
        .map(|choice| table.num_people_per_discrete_choice(choice))
        .sum();
    assert_eq!(counted, table.num_people());
    assert!(table.max_num_discrete_choices() <= table.total_num_discrete_choices());
}

#[test]
fn truncated_attribute_table_fails_to_load() {
    let mut rng = SmallRng::seed_from_u64(8);
    let dataset = random_dataset(10, 2, &mut rng);
    let rows = dataset.attributes.n_entries();
    let truncated = Table::from_matrix(dataset.attributes.data().columns(0, rows - 1).into_owned());

    let result = DcmTable::init(
        truncated,
        &[2],
        dataset.decisions,
        dataset.num_alternatives,
        DiagonalGaussianDistribution::default(),
        &mut rng,
    );
    match result {
        Err(DcmError::InconsistentAlternativeTotal {
            cumulative,
            attribute_rows,
        }) => {
            assert_eq!(cumulative, rows);
            assert_eq!(attribute_rows, rows - 1);
        }
        other => panic!("expected an inconsistent total, got {other:?}"),
    }
}

#[test]
fn table_is_shared_across_threads() {
    let table = random_table(41, 40);
    let draws: Vec<DVector<f64>> = (0..32)
        .map(|i| DVector::from_element(table.num_attributes(), i as f64 / 8.0 - 2.0))
        .collect();

    for person in 0..table.num_people() {
        let simulated = table.simulated_choice_probabilities(person, &draws).unwrap();
        let mean = simulated.iter().sum::<f64>() / simulated.len() as f64;
        assert!(mean > 0.0 && mean <= 1.0);
    }
}
