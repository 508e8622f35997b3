//! Weighted wheel draw, computed on the organizer's side before the result
//! is broadcast as `START_DRAW`.

use core::error::Error;
use std::fmt;

use rand::Rng;
use shared::payload::{DrawOutcome, WheelConfig, WheelItem};

const FULL_TURN: f64 = 360.0;
const EXTRA_TURNS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    NoItems,
    ZeroWeight,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::NoItems => write!(f, "Add at least one item before drawing."),
            DrawError::ZeroWeight => write!(f, "Every item has quantity 0, nothing can win."),
        }
    }
}

impl Error for DrawError {}

fn total_weight(items: &[WheelItem]) -> Result<u64, DrawError> {
    if items.is_empty() {
        return Err(DrawError::NoItems);
    }

    let total: u64 = items.iter().map(|item| item.quantidade as u64).sum();

    if total == 0 {
        return Err(DrawError::ZeroWeight);
    }

    Ok(total)
}

/// Picks the index of the winning item. Each item's chance is proportional
/// to its `quantidade`; items with quantity 0 never win.
pub fn pick_winner<R: Rng>(items: &[WheelItem], rng: &mut R) -> Result<usize, DrawError> {
    let total = total_weight(items)?;
    let ticket = rng.random::<f64>() * total as f64;

    Ok(winner_for_ticket(items, ticket))
}

/// Item whose cumulative range contains `ticket`. A ticket at or past the
/// total (float rounding) goes to the last item that can win.
fn winner_for_ticket(items: &[WheelItem], ticket: f64) -> usize {
    let mut cumulative = 0u64;

    for (index, item) in items.iter().enumerate() {
        cumulative += item.quantidade as u64;

        if ticket < cumulative as f64 {
            return index;
        }
    }

    items
        .iter()
        .rposition(|item| item.quantidade > 0)
        .unwrap_or(0)
}

/// Absolute rotation, in degrees, that leaves a random point of the
/// winner's slice under the pointer at 0°. Always at least five full turns
/// past `current_rotation`, so the wheel keeps spinning forward.
pub fn final_angle<R: Rng>(
    items: &[WheelItem],
    winner: usize,
    current_rotation: f64,
    rng: &mut R,
) -> Result<f64, DrawError> {
    let total = total_weight(items)?;
    let degrees_per_unit = FULL_TURN / total as f64;

    let slice_start: f64 = items[..winner]
        .iter()
        .map(|item| item.quantidade as f64 * degrees_per_unit)
        .sum();
    let slice_width = items[winner].quantidade as f64 * degrees_per_unit;

    let winning_angle = slice_start + rng.random::<f64>() * slice_width;
    let target_angle = FULL_TURN - winning_angle;
    let current_angle = current_rotation % FULL_TURN;
    let spin = (target_angle - current_angle + FULL_TURN) % FULL_TURN;

    Ok(current_rotation + EXTRA_TURNS * FULL_TURN + spin)
}

pub fn run_draw<R: Rng>(
    config: &WheelConfig,
    current_rotation: f64,
    rng: &mut R,
) -> Result<DrawOutcome, DrawError> {
    let winner = pick_winner(&config.itens, rng)?;
    let angle = final_angle(&config.itens, winner, current_rotation, rng)?;

    Ok(DrawOutcome {
        angulo_final: angle,
        vencedor: config.itens[winner].nome.clone(),
        tempo_rotacao: config.tempo_rotacao,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn items(weights: &[u32]) -> Vec<WheelItem> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| WheelItem::new(format!("P{}", i + 1), *w))
            .collect()
    }

    /// Angle on the wheel that ends up under the pointer after rotating.
    fn pointer_angle(rotation: f64) -> f64 {
        (FULL_TURN - rotation % FULL_TURN) % FULL_TURN
    }

    #[test]
    fn empty_and_weightless_wheels_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(pick_winner(&[], &mut rng), Err(DrawError::NoItems));
        assert_eq!(pick_winner(&items(&[0, 0]), &mut rng), Err(DrawError::ZeroWeight));
        assert_eq!(
            run_draw(&WheelConfig::default(), 0.0, &mut rng),
            Err(DrawError::NoItems)
        );
    }

    #[test]
    fn single_item_always_wins() {
        let mut rng = StdRng::seed_from_u64(7);
        let wheel = items(&[3]);

        for _ in 0..100 {
            assert_eq!(pick_winner(&wheel, &mut rng), Ok(0));
        }
    }

    #[test]
    fn zero_quantity_items_never_win() {
        let mut rng = StdRng::seed_from_u64(42);
        let wheel = items(&[0, 5, 0, 1]);

        for _ in 0..1000 {
            let winner = pick_winner(&wheel, &mut rng).unwrap();
            assert!(winner == 1 || winner == 3);
        }
    }

    #[test]
    fn ticket_at_total_goes_to_last_winnable_item() {
        assert_eq!(winner_for_ticket(&items(&[0, 2, 0]), 2.0), 1);
        assert_eq!(winner_for_ticket(&items(&[3, 1, 0]), 4.0), 1);
        assert_eq!(winner_for_ticket(&items(&[0, 2, 0]), 0.0), 1);
        assert_eq!(winner_for_ticket(&items(&[1, 1]), 1.0), 1);
    }

    #[test]
    fn heavier_items_win_more_often() {
        let mut rng = StdRng::seed_from_u64(3);
        let wheel = items(&[1, 9]);
        let mut wins = [0usize; 2];

        for _ in 0..5000 {
            wins[pick_winner(&wheel, &mut rng).unwrap()] += 1;
        }

        assert!(wins[1] > wins[0] * 4);
    }

    #[test]
    fn final_angle_lands_inside_winning_slice() {
        let mut rng = StdRng::seed_from_u64(11);
        let wheel = items(&[10, 5, 3]);
        let mut rotation = 0.0;

        for _ in 0..200 {
            let winner = pick_winner(&wheel, &mut rng).unwrap();
            let angle = final_angle(&wheel, winner, rotation, &mut rng).unwrap();

            let degrees_per_unit = FULL_TURN / 18.0;
            let start: f64 = wheel[..winner]
                .iter()
                .map(|item| item.quantidade as f64 * degrees_per_unit)
                .sum();
            let end = start + wheel[winner].quantidade as f64 * degrees_per_unit;
            let landed = pointer_angle(angle);

            assert!(angle >= rotation + EXTRA_TURNS * FULL_TURN);
            assert!(angle < rotation + (EXTRA_TURNS + 1.0) * FULL_TURN);
            assert!(
                landed >= start - 1e-6 && landed <= end + 1e-6,
                "landed at {} outside [{}, {}]",
                landed,
                start,
                end
            );

            rotation = angle;
        }
    }

    #[test]
    fn outcome_carries_winner_name_and_rotation_time() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = WheelConfig {
            itens: vec![WheelItem::new("Only prize", 2)],
            tempo_rotacao: 4.0,
            ..WheelConfig::default()
        };

        let outcome = run_draw(&config, 90.0, &mut rng).unwrap();

        assert_eq!(outcome.vencedor, "Only prize");
        assert_eq!(outcome.tempo_rotacao, 4.0);
        assert!(outcome.angulo_final >= 90.0 + EXTRA_TURNS * FULL_TURN);
    }
}
