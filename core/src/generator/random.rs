use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Generation strategy that keeps the first move and its neighbors free of mines, but other than that is purely
/// random. The same seed always yields the same sequence of boards.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    rng: SmallRng,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self, config: &Configuration, safe_zone: Option<Coordinate>) -> Board {
        let (width, height) = (config.width(), config.height());
        let total_cells = config.total_cells() as usize;

        let forbidden = forbidden_positions(config, safe_zone);
        let mut candidates: Vec<usize> = (0..total_cells).filter(|&pos| !forbidden[pos]).collect();
        candidates.shuffle(&mut self.rng);

        let requested = config.mine_count() as usize;
        let to_place = requested.min(candidates.len());
        if to_place < requested {
            log::warn!(
                "Safe zone leaves room for {} mines, requested {}",
                to_place,
                requested
            );
        }

        // place mines and accumulate neighbor counts in the same pass
        let shape = (height as usize, width as usize);
        let mut mines: Array2<bool> = Array2::default(shape);
        let mut neighbor_counts: Array2<u8> = Array2::zeros(shape);
        for &pos in &candidates[..to_place] {
            let coords = Coordinate::from_flat_index(pos, width);
            mines[coords.to_nd_index()] = true;
            for neighbor in NeighborIter::new(coords, height, width) {
                neighbor_counts[neighbor.to_nd_index()] += 1;
            }
        }

        let cells = Array2::from_shape_fn(shape, |index| {
            if mines[index] {
                Cell::mine()
            } else {
                Cell::safe(neighbor_counts[index])
            }
        });

        log::debug!(
            "Generated {}x{} board with {} mines, safe zone around {:?}",
            width,
            height,
            to_place,
            safe_zone
        );
        Board::from_cells(cells, width, height, to_place as CellCount)
    }
}

/// Flags `safe_zone` and its in-bounds neighbors, indexed by flat position.
fn forbidden_positions(config: &Configuration, safe_zone: Option<Coordinate>) -> Vec<bool> {
    let (width, height) = (config.width(), config.height());
    let mut forbidden = vec![false; config.total_cells() as usize];

    match safe_zone {
        Some(center) if config.is_valid_coordinate(center) => {
            forbidden[center.flat_index(width)] = true;
            for coords in NeighborIter::new(center, height, width) {
                forbidden[coords.flat_index(width)] = true;
            }
        }
        Some(center) => log::warn!("Safe zone center {} is out of bounds, ignored", center),
        None => {}
    }

    forbidden
}
