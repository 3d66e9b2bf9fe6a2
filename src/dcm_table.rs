//! Ragged per-person choice data indexed for constant-time lookup.
//!
//! The attribute rows of all (person, alternative) pairs live in a single flat
//! [`Table`], with each person's alternatives stored contiguously. A prefix sum
//! over the per-person alternative counts maps a person to the first row of
//! their block.

use std::path::Path;

use nalgebra::DVectorView;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::distribution::Distribution;
use crate::error::{DcmError, Result};
use crate::options::DcmOptions;
use crate::table::Table;

/// Discrete choice data for every person together with the distribution that
/// generates the taste coefficients.
///
/// Built once and read-only afterwards; all accessors take `&self`, so a table
/// can be shared across threads evaluating many draws of `beta`.
#[derive(Clone, Debug)]
pub struct DcmTable<D> {
    distribution: D,
    attribute_table: Table,
    attribute_dimensions: Vec<usize>,
    /// Zero-based chosen alternative per person (one column).
    decisions_table: Table,
    num_alternatives_table: Table,
    chosen_indices: Vec<usize>,
    num_alternatives: Vec<usize>,
    /// Row of the attribute table holding each person's first alternative.
    cumulative_num_discrete_choices: Vec<usize>,
    shuffled_indices_for_person: Vec<usize>,
    num_people_per_discrete_choice: Vec<usize>,
    options: DcmOptions,
}

impl<D: Distribution> DcmTable<D> {
    /// Indexes the raw tables. `decisions_table` holds 1-based chosen
    /// alternatives and is converted to 0-based in place; `rng` drives the
    /// shuffled person order.
    pub fn init<R: Rng + ?Sized>(
        attribute_table: Table,
        attribute_dimensions: &[usize],
        decisions_table: Table,
        num_alternatives_table: Table,
        distribution: D,
        rng: &mut R,
    ) -> Result<Self> {
        DcmTableBuilder::new(attribute_table, attribute_dimensions.to_vec())
            .decisions(decisions_table)
            .num_alternatives(num_alternatives_table)
            .distribution(distribution)
            .build(rng)
    }

    /// Loads the three tables written by [`DcmTable::save`] and indexes them.
    pub fn load<P: AsRef<Path>, R: Rng + ?Sized>(
        attribute_path: P,
        decisions_path: P,
        num_alternatives_path: P,
        attribute_dimensions: &[usize],
        distribution: D,
        rng: &mut R,
    ) -> Result<Self> {
        let attribute_table = Table::load(attribute_path)?;
        let decisions_table = Table::load(decisions_path)?;
        let num_alternatives_table = Table::load(num_alternatives_path)?;
        Self::init(
            attribute_table,
            attribute_dimensions,
            decisions_table,
            num_alternatives_table,
            distribution,
            rng,
        )
    }

    /// Number of free parameters of the taste distribution.
    pub fn num_parameters(&self) -> usize {
        self.distribution.num_parameters()
    }
}

impl<D> DcmTable<D> {
    /// Writes the three underlying tables. Decisions are written 1-based, as
    /// they were supplied, so the files can be passed straight to
    /// [`DcmTable::load`].
    pub fn save<P: AsRef<Path>>(
        &self,
        attribute_path: P,
        decisions_path: P,
        num_alternatives_path: P,
    ) -> Result<()> {
        let mut one_based = self.decisions_table.clone();
        for person in 0..one_based.n_entries() {
            one_based.get_mut(person)[0] += 1.0;
        }
        self.attribute_table.save(attribute_path)?;
        one_based.save(decisions_path)?;
        self.num_alternatives_table.save(num_alternatives_path)?;
        Ok(())
    }

    /// Returns the distribution from which each `beta` is drawn.
    pub fn distribution(&self) -> &D {
        &self.distribution
    }

    /// Returns the options used for probability computation.
    pub fn options(&self) -> &DcmOptions {
        &self.options
    }

    /// Component widths of each attribute vector.
    pub fn attribute_dimensions(&self) -> &[usize] {
        &self.attribute_dimensions
    }

    /// Returns the flat attribute table.
    pub fn attribute_table(&self) -> &Table {
        &self.attribute_table
    }

    /// Total number of people.
    pub fn num_people(&self) -> usize {
        self.cumulative_num_discrete_choices.len()
    }

    /// Length of each attribute vector.
    pub fn num_attributes(&self) -> usize {
        self.attribute_table.n_attributes()
    }

    /// Number of alternatives available to `person_index`.
    pub fn num_discrete_choices(&self, person_index: usize) -> usize {
        self.num_alternatives[person_index]
    }

    /// Number of (person, alternative) pairs, i.e. attribute rows.
    pub fn total_num_discrete_choices(&self) -> usize {
        self.attribute_table.n_entries()
    }

    /// Largest choice set over all people; the number of buckets behind
    /// [`num_people_per_discrete_choice`](Self::num_people_per_discrete_choice).
    pub fn max_num_discrete_choices(&self) -> usize {
        self.num_people_per_discrete_choice.len()
    }

    /// Zero-based index of the alternative `person_index` actually chose.
    pub fn chosen_index(&self, person_index: usize) -> usize {
        self.chosen_indices[person_index]
    }

    /// Number of people whose chosen alternative has zero-based index
    /// `discrete_choice_index`.
    pub fn num_people_per_discrete_choice(&self, discrete_choice_index: usize) -> usize {
        self.num_people_per_discrete_choice[discrete_choice_index]
    }

    /// Person visited at position `pos` of the shuffled order.
    pub fn shuffled_index_for_person(&self, pos: usize) -> usize {
        self.shuffled_indices_for_person[pos]
    }

    /// The whole shuffled person order.
    pub fn shuffled_indices(&self) -> &[usize] {
        &self.shuffled_indices_for_person
    }

    /// Attribute row of the first alternative of `person_index`.
    pub fn cumulative_offset(&self, person_index: usize) -> usize {
        self.cumulative_num_discrete_choices[person_index]
    }

    /// Attribute vector of alternative `discrete_choice_index` for `person_index`.
    ///
    /// The alternative index must be below
    /// [`num_discrete_choices`](Self::num_discrete_choices) for that person.
    pub fn attribute_vector(
        &self,
        person_index: usize,
        discrete_choice_index: usize,
    ) -> DVectorView<'_, f64> {
        debug_assert!(discrete_choice_index < self.num_alternatives[person_index]);
        let index = self.cumulative_num_discrete_choices[person_index] + discrete_choice_index;
        self.attribute_table.get(index)
    }
}

/// Builder that validates the raw tables before constructing a [`DcmTable`].
#[derive(Debug)]
pub struct DcmTableBuilder<D> {
    attribute_table: Table,
    attribute_dimensions: Vec<usize>,
    decisions_table: Option<Table>,
    num_alternatives_table: Option<Table>,
    distribution: Option<D>,
    options: DcmOptions,
}

impl<D: Distribution> DcmTableBuilder<D> {
    /// Start building from the flat attribute table and its component widths.
    pub fn new(attribute_table: Table, attribute_dimensions: Vec<usize>) -> Self {
        Self {
            attribute_table,
            attribute_dimensions,
            decisions_table: None,
            num_alternatives_table: None,
            distribution: None,
            options: DcmOptions::default(),
        }
    }

    /// Sets the 1-based chosen alternative per person.
    pub fn decisions(mut self, table: Table) -> Self {
        self.decisions_table = Some(table);
        self
    }

    /// Sets the number of alternatives per person.
    pub fn num_alternatives(mut self, table: Table) -> Self {
        self.num_alternatives_table = Some(table);
        self
    }

    /// Sets the taste distribution; it is initialized during [`build`](Self::build).
    pub fn distribution(mut self, distribution: D) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Overrides the default options.
    pub fn options(mut self, options: DcmOptions) -> Self {
        self.options = options;
        self
    }

    /// Finalizes construction after validating and indexing the tables.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<DcmTable<D>> {
        self.options.validate()?;
        let mut decisions_table = self
            .decisions_table
            .ok_or_else(|| DcmError::missing_component("decisions table"))?;
        let num_alternatives_table = self
            .num_alternatives_table
            .ok_or_else(|| DcmError::missing_component("number of alternatives table"))?;
        let mut distribution = self
            .distribution
            .ok_or_else(|| DcmError::missing_component("distribution"))?;
        let attribute_table = self.attribute_table;

        let num_people = decisions_table.n_entries();
        if num_people == 0 {
            return Err(DcmError::EmptyTable { table: "decisions" });
        }
        if num_alternatives_table.n_entries() != num_people {
            return Err(DcmError::dimension_mismatch(
                "number of alternatives entries",
                num_people,
                num_alternatives_table.n_entries(),
            ));
        }
        if decisions_table.n_attributes() != 1 {
            return Err(DcmError::dimension_mismatch(
                "decisions columns",
                1,
                decisions_table.n_attributes(),
            ));
        }
        if num_alternatives_table.n_attributes() != 1 {
            return Err(DcmError::dimension_mismatch(
                "number of alternatives columns",
                1,
                num_alternatives_table.n_attributes(),
            ));
        }
        let attribute_width: usize = self.attribute_dimensions.iter().sum();
        if attribute_width != attribute_table.n_attributes() {
            return Err(DcmError::dimension_mismatch(
                "attribute dimensions",
                attribute_table.n_attributes(),
                attribute_width,
            ));
        }

        // Decisions arrive 1-based.
        for person in 0..num_people {
            decisions_table.get_mut(person)[0] -= 1.0;
        }

        distribution.init(&self.attribute_dimensions)?;

        let mut shuffled_indices_for_person: Vec<usize> = (0..num_people).collect();
        shuffled_indices_for_person.shuffle(rng);

        let num_alternatives = (0..num_people)
            .map(|person| {
                let count = read_count(&num_alternatives_table, "number of alternatives", person)?;
                // A single choice set cannot outnumber the attribute rows.
                if count == 0 || count > attribute_table.n_entries() {
                    return Err(DcmError::InvalidCount {
                        table: "number of alternatives",
                        index: person,
                        value: num_alternatives_table.get(person)[0],
                    });
                }
                Ok(count)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut cumulative_num_discrete_choices = Vec::with_capacity(num_people);
        let mut running = 0usize;
        for (person, &count) in num_alternatives.iter().enumerate() {
            cumulative_num_discrete_choices.push(running);
            running = running
                .checked_add(count)
                .ok_or(DcmError::InvalidCount {
                    table: "number of alternatives",
                    index: person,
                    value: count as f64,
                })?;
        }

        let cumulative = running;
        if cumulative != attribute_table.n_entries() {
            log::error!(
                "cumulative number of discrete choices {} does not match {} attribute vectors",
                cumulative,
                attribute_table.n_entries()
            );
            return Err(DcmError::InconsistentAlternativeTotal {
                cumulative,
                attribute_rows: attribute_table.n_entries(),
            });
        }
        log::info!(
            "indexed {} people over {} discrete choices",
            num_people,
            cumulative
        );

        let chosen_indices = (0..num_people)
            .map(|person| chosen_index(&decisions_table, person, num_alternatives[person]))
            .collect::<Result<Vec<_>>>()?;

        let max_alternatives = num_alternatives.iter().copied().max().unwrap_or(0);
        let mut num_people_per_discrete_choice = vec![0usize; max_alternatives];
        for &choice in &chosen_indices {
            num_people_per_discrete_choice[choice] += 1;
        }
        log::debug!(
            "people per discrete choice: {:?}",
            num_people_per_discrete_choice
        );

        Ok(DcmTable {
            distribution,
            attribute_table,
            attribute_dimensions: self.attribute_dimensions,
            decisions_table,
            num_alternatives_table,
            chosen_indices,
            num_alternatives,
            cumulative_num_discrete_choices,
            shuffled_indices_for_person,
            num_people_per_discrete_choice,
            options: self.options,
        })
    }
}

/// Reads a non-negative integer stored in a single-column table.
fn read_count(table: &Table, name: &'static str, index: usize) -> Result<usize> {
    let value = table.get(index)[0];
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(DcmError::InvalidCount {
            table: name,
            index,
            value,
        });
    }
    Ok(value as usize)
}

/// Reads an already zero-based decision and checks it against the choice set.
fn chosen_index(decisions_table: &Table, person: usize, alternatives: usize) -> Result<usize> {
    let value = decisions_table.get(person)[0];
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(DcmError::InvalidCount {
            table: "decisions",
            index: person,
            value: value + 1.0,
        });
    }
    if value < 0.0 || value as usize >= alternatives {
        return Err(DcmError::ChoiceOutOfRange {
            person,
            choice: value + 1.0,
            alternatives,
        });
    }
    Ok(value as usize)
}
