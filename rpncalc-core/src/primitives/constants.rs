// Constant primitives - push well-known values

use crate::display;
use crate::math;
use crate::session::Session;
use crate::value::{CalcError, Decimal, Result};
use std::str::FromStr;

pub const PI: &str = "3.14159265358979323846264338327950288419716939937510";
pub const PHI: &str = "1.61803398874989";
pub const EULERS_NUMBER: &str = "2.7182818284590452353602874713527";
pub const EULERS_CONSTANT: &str = "0.5772156649015328606065120900824024310421";
pub const SPEED_OF_LIGHT: &str = "299792458";

fn constant(text: &str) -> Result<Decimal> {
    Decimal::from_str(text).map_err(|e| CalcError::invalid_argument(e.to_string()))
}

fn push_constant(session: &mut Session, text: &str) -> Result<()> {
    let value = constant(text)?;
    session.push_checked(value);
    Ok(())
}

pub fn pi_impl(session: &mut Session) -> Result<()> {
    push_constant(session, PI)
}

// Shows the golden sections of the current top value before pushing phi
pub fn phi_impl(session: &mut Session) -> Result<()> {
    let phi = constant(PHI)?;
    if let Some(top) = session.stack.peek().cloned() {
        let larger = math::divide(&top, &phi)?;
        let smaller = &top - &larger;
        session.header(&format!("Golden sections of {}", display::comma(&top)));
        session.result(&format!(
            "{}  +  {}",
            display::comma(&math::round_half_up(&larger, 4)),
            display::comma(&math::round_half_up(&smaller, 4))
        ));
    }
    session.push_checked(phi);
    Ok(())
}

pub fn eulers_number_impl(session: &mut Session) -> Result<()> {
    push_constant(session, EULERS_NUMBER)
}

pub fn eulers_constant_impl(session: &mut Session) -> Result<()> {
    push_constant(session, EULERS_CONSTANT)
}

pub fn speed_of_light_impl(session: &mut Session) -> Result<()> {
    push_constant(session, SPEED_OF_LIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferOutput;
    use crate::session::Settings;
    use crate::store::MemoryStore;

    #[test]
    fn test_constants_push_with_checkpoint() {
        let mut session = Session::new();
        pi_impl(&mut session).unwrap();
        eulers_number_impl(&mut session).unwrap();
        eulers_constant_impl(&mut session).unwrap();
        speed_of_light_impl(&mut session).unwrap();
        assert_eq!(session.stack.len(), 4);
        assert_eq!(session.stack.undo_len(), 4);
        assert_eq!(session.top().unwrap(), Decimal::from(299_792_458));
        assert!(session.stack.get_line(4).unwrap().to_plain_string().starts_with("3.14159265358979"));
    }

    #[test]
    fn test_phi_shows_golden_sections() {
        let output = BufferOutput::new();
        let log = output.log();
        let mut session =
            Session::with_parts(Box::new(MemoryStore::new()), Box::new(output), Settings::default());
        phi_impl(&mut session).unwrap();
        assert!(log.borrow().is_empty());

        session.stack.push(Decimal::from(100));
        phi_impl(&mut session).unwrap();
        assert_eq!(session.top().unwrap(), constant(PHI).unwrap());
        assert!(log.borrow().iter().any(|(_, text)| text.contains("61.8034")));
    }
}
