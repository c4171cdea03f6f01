//! CLI subcommand implementations.

pub mod play;
pub mod render;
pub mod scales;

/// Pot position that lands in the center of discrete bin `index` of
/// `count`, for driving the engine's scale/octave selection from a CLI
/// index argument.
pub(crate) fn index_to_pot(index: usize, count: usize) -> f32 {
    (index as f32 + 0.5) / count as f32
}

#[cfg(test)]
mod tests {
    use super::index_to_pot;
    use tines_engine::map_discrete;

    #[test]
    fn pot_position_round_trips_through_discrete_map() {
        for count in 1..8 {
            for index in 0..count {
                let pot = index_to_pot(index, count);
                assert_eq!(map_discrete(pot, count), index, "count {count}");
            }
        }
    }
}
