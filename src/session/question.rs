use rand::Rng;

use crate::catalog::{Catalog, WordId};

#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub target: WordId,
    pub options: [WordId; 2],
}

impl Question {
    /// Picks a random target and a distractor with a different catalog index, in random order.
    ///
    /// The catalog is guaranteed to hold at least two words, so the resampling loop terminates.
    pub fn generate<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Question {
        let size = catalog.size();
        let target = rng.gen_range(0..size);
        let mut distractor = rng.gen_range(0..size);
        while distractor == target {
            distractor = rng.gen_range(0..size);
        }

        let (target, distractor) = (WordId::new(target), WordId::new(distractor));
        let options = if rng.gen_bool(0.5) {
            [target, distractor]
        } else {
            [distractor, target]
        };

        Question { target, options }
    }

    pub fn has_option(&self, id: WordId) -> bool {
        self.options.contains(&id)
    }

    pub fn is_target(&self, id: WordId) -> bool {
        self.target == id
    }
}
