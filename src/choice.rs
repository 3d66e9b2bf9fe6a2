//! Multinomial logit choice probabilities for a single draw of `beta`.

use nalgebra::DVector;
use rayon::prelude::*;

use crate::dcm_table::DcmTable;
use crate::error::{DcmError, Result};

/// Turns utilities into logit probabilities in place.
///
/// Each score is centred on the maximum and offset by `shift` before
/// exponentiation, so every exponent is at most `shift`.
pub fn shifted_softmax(scores: &mut [f64], shift: f64) {
    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut normalizing_sum = 0.0_f64;
    for score in scores.iter_mut() {
        let weight = (*score - max_score + shift).exp();
        normalizing_sum += weight;
        *score = weight;
    }

    for probability in scores.iter_mut() {
        *probability /= normalizing_sum;
    }
}

impl<D> DcmTable<D> {
    /// Probability of each alternative of `person_index` under `beta`, written
    /// into `out` (resized as needed).
    pub fn choice_probabilities_into(
        &self,
        person_index: usize,
        beta: &DVector<f64>,
        out: &mut DVector<f64>,
    ) {
        debug_assert_eq!(beta.len(), self.num_attributes());
        let num_discrete_choices = self.num_discrete_choices(person_index);
        if out.len() != num_discrete_choices {
            *out = DVector::zeros(num_discrete_choices);
        }

        for discrete_choice_index in 0..num_discrete_choices {
            let attributes = self.attribute_vector(person_index, discrete_choice_index);
            out[discrete_choice_index] = beta.dot(&attributes);
        }

        shifted_softmax(out.as_mut_slice(), self.options().exponent_shift);
    }

    /// Probability of each alternative of `person_index` under `beta`.
    pub fn choice_probabilities(&self, person_index: usize, beta: &DVector<f64>) -> DVector<f64> {
        let mut probabilities = DVector::zeros(self.num_discrete_choices(person_index));
        self.choice_probabilities_into(person_index, beta, &mut probabilities);
        probabilities
    }

    /// Probability of the alternative `person_index` actually chose.
    pub fn choice_probability(&self, person_index: usize, beta: &DVector<f64>) -> f64 {
        let probabilities = self.choice_probabilities(person_index, beta);
        probabilities[self.chosen_index(person_index)]
    }
}

impl<D: Sync> DcmTable<D> {
    /// Evaluates [`choice_probability`](Self::choice_probability) for every
    /// draw in parallel, one value per draw in order.
    pub fn simulated_choice_probabilities(
        &self,
        person_index: usize,
        draws: &[DVector<f64>],
    ) -> Result<Vec<f64>> {
        if let Some(draw) = draws.iter().find(|draw| draw.len() != self.num_attributes()) {
            return Err(DcmError::dimension_mismatch(
                "beta length",
                self.num_attributes(),
                draw.len(),
            ));
        }

        Ok(draws
            .par_iter()
            .map_init(
                || DVector::zeros(self.num_discrete_choices(person_index)),
                |buffer, beta| {
                    self.choice_probabilities_into(person_index, beta, buffer);
                    buffer[self.chosen_index(person_index)]
                },
            )
            .collect())
    }
}
