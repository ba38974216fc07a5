// Random number primitives - uniform integers and dice rolls

use crate::session::Session;
use crate::value::{CalcError, Decimal, Result};
use rand::Rng;
use tracing::debug;

pub const DEFAULT_LOW: i64 = 1;
pub const DEFAULT_HIGH: i64 = 100;

fn parse_bound(token: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|_| CalcError::invalid_argument(format!("'{}' is not a valid integer", token)))
}

// rand [low high]
pub fn random_impl(session: &mut Session, param: &str) -> Result<()> {
    let tokens: Vec<&str> = param.split_whitespace().collect();
    let (low, high) = match tokens.as_slice() {
        [] => (DEFAULT_LOW, DEFAULT_HIGH),
        [low, high] => (parse_bound(low)?, parse_bound(high)?),
        _ => {
            return Err(CalcError::invalid_argument(
                "random takes no arguments or a low and a high bound",
            ));
        }
    };
    if low > high {
        return Err(CalcError::invalid_argument(format!(
            "low bound {} is greater than high bound {}",
            low, high
        )));
    }

    let n = rand::thread_rng().gen_range(low..=high);
    debug!("random {}..={} => {}", low, high, n);
    session.push_checked(Decimal::from(n));
    Ok(())
}

/// Parse dice notation such as `3d6` or `d20` into (count, sides).
pub fn parse_dice(notation: &str) -> Result<(u32, u64)> {
    let notation = notation.trim().to_lowercase();
    let invalid = || CalcError::invalid_argument(format!("'{}' is not valid dice notation (XdY)", notation));
    let (count, sides) = notation.split_once('d').ok_or_else(invalid)?;
    let count = if count.is_empty() {
        1
    } else {
        count.parse::<u32>().map_err(|_| invalid())?
    };
    let sides = sides.parse::<u64>().map_err(|_| invalid())?;
    if count == 0 || sides == 0 {
        return Err(invalid());
    }
    Ok((count, sides))
}

// dice [XdY], one checkpoint for all the rolls
pub fn dice_impl(session: &mut Session, param: &str) -> Result<()> {
    let (count, sides) = if param.trim().is_empty() {
        (1, 6)
    } else {
        parse_dice(param)?
    };

    let mut rng = rand::thread_rng();
    let rolls: Vec<u64> = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
    debug!("rolled {}d{} => {:?}", count, sides, rolls);

    session.stack.save_undo();
    for roll in &rolls {
        session.stack.push(Decimal::from(*roll));
    }
    let listing: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
    session.info(&format!("Rolling {}d{}: {}", count, sides, listing.join(", ")));
    Ok(())
}
