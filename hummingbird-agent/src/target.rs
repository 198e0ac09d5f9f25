//! Nearest-flower target selection.
use crate::flower::{Flower, FlowerId};
use glam::Vec3;

/// Picks the nearest flower that still has nectar.
///
/// Flowers are ranked by the distance from their position to `reference`,
/// usually the beak tip. The scan is a single pass in iteration order and a
/// candidate replaces the current best only when it is strictly closer, so of
/// equally distant flowers the first one wins. Returns `None` when no flower
/// has nectar.
pub fn select_nearest<'a, I>(flowers: I, reference: Vec3) -> Option<FlowerId>
where
    I: IntoIterator<Item = &'a Flower>,
{
    let mut best: Option<&Flower> = None;
    for flower in flowers {
        if !flower.has_nectar() {
            continue;
        }
        best = match best {
            None => Some(flower),
            Some(b)
                if !b.has_nectar()
                    || flower.position.distance(reference)
                        < b.position.distance(reference) =>
            {
                Some(flower)
            }
            keep => keep,
        };
    }
    best.map(|f| f.id)
}
