//! Position and size of items that cover a rectangle, such as objects,
//! zones and locations.

use varistruct::{Error, Result, StructInstance};

use crate::game::Game;

/// Rectangle access over the `x`, `y`, `width` and `height` fields.
///
/// Setters either write every field or none of them.
pub trait PositionAndSize {
    fn position(&self) -> Result<(i32, i32)>;
    fn set_position(&mut self, position: (i32, i32)) -> Result<()>;

    fn size(&self) -> Result<(i32, i32)>;
    fn set_size(&mut self, size: (i32, i32)) -> Result<()>;

    /// `(x, y, width, height)`.
    fn dimensions(&self) -> Result<(i32, i32, i32, i32)>;
    fn set_dimensions(&mut self, dimensions: (i32, i32, i32, i32)) -> Result<()>;
}

impl PositionAndSize for StructInstance<Game> {
    fn position(&self) -> Result<(i32, i32)> {
        Ok((integer(self, "x")?, integer(self, "y")?))
    }

    fn set_position(&mut self, (x, y): (i32, i32)) -> Result<()> {
        set_all(self, &[("x", x), ("y", y)])
    }

    fn size(&self) -> Result<(i32, i32)> {
        Ok((integer(self, "width")?, integer(self, "height")?))
    }

    fn set_size(&mut self, (width, height): (i32, i32)) -> Result<()> {
        set_all(self, &[("width", width), ("height", height)])
    }

    fn dimensions(&self) -> Result<(i32, i32, i32, i32)> {
        let (x, y) = self.position()?;
        let (width, height) = self.size()?;
        Ok((x, y, width, height))
    }

    fn set_dimensions(&mut self, (x, y, width, height): (i32, i32, i32, i32)) -> Result<()> {
        set_all(self, &[("x", x), ("y", y), ("width", width), ("height", height)])
    }
}

fn set_all(item: &mut StructInstance<Game>, values: &[(&str, i32)]) -> Result<()> {
    let mut staged = item.clone();
    for &(name, value) in values {
        staged.set(name, value)?;
    }
    *item = staged;
    Ok(())
}

/// Reads an integer field as `T`.
pub(crate) fn integer<T: TryFrom<i128>>(item: &StructInstance<Game>, name: &str) -> Result<T> {
    let value = item.get(name)?;
    value
        .as_int()
        .and_then(|raw| T::try_from(raw).ok())
        .ok_or_else(|| Error::InvalidValue {
            field: Some(name.to_owned()),
            expected: std::any::type_name::<T>().to_owned(),
            value: value.to_string(),
        })
}
