//! The six releases of the series as a [`Variant`].

use std::fmt;

use varistruct::{Endianness, Variant, VariantGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Game {
    Nsmb,
    Nsmbw,
    Nsmb2,
    Nsmbu,
    Nslu,
    Nsmbudx,
}

impl Game {
    pub const ALL: [Game; 6] = [
        Game::Nsmb,
        Game::Nsmbw,
        Game::Nsmb2,
        Game::Nsmbu,
        Game::Nslu,
        Game::Nsmbudx,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Game::Nsmb => "New Super Mario Bros.",
            Game::Nsmbw => "New Super Mario Bros. Wii",
            Game::Nsmb2 => "New Super Mario Bros. 2",
            Game::Nsmbu => "New Super Mario Bros. U",
            Game::Nslu => "New Super Luigi U",
            Game::Nsmbudx => "New Super Mario Bros. U Deluxe",
        }
    }

    /// NSMBU and NSLU.
    pub fn is_wii_u(self) -> bool {
        self.is_member_of(GameGroup::WiiU)
    }

    /// NSMBU, NSLU, and NSMBUDX.
    pub fn is_like_nsmbu(self) -> bool {
        self.is_member_of(GameGroup::LikeNsmbu)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameGroup {
    WiiU,
    /// The Wii U games and their Switch port, which share one engine.
    LikeNsmbu,
}

impl VariantGroup for GameGroup {
    fn all() -> &'static [Self] {
        &[GameGroup::WiiU, GameGroup::LikeNsmbu]
    }

    fn name(self) -> &'static str {
        match self {
            GameGroup::WiiU => "wiiu",
            GameGroup::LikeNsmbu => "like_nsmbu",
        }
    }
}

impl Variant for Game {
    type Group = GameGroup;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(self) -> &'static str {
        match self {
            Game::Nsmb => "NSMB",
            Game::Nsmbw => "NSMBW",
            Game::Nsmb2 => "NSMB2",
            Game::Nsmbu => "NSMBU",
            Game::Nslu => "NSLU",
            Game::Nsmbudx => "NSMBUDX",
        }
    }

    fn endianness(self) -> Endianness {
        match self {
            Game::Nsmb | Game::Nsmb2 | Game::Nsmbudx => Endianness::Little,
            Game::Nsmbw | Game::Nsmbu | Game::Nslu => Endianness::Big,
        }
    }

    fn is_member_of(self, group: GameGroup) -> bool {
        match group {
            GameGroup::WiiU => matches!(self, Game::Nsmbu | Game::Nslu),
            GameGroup::LikeNsmbu => matches!(self, Game::Nsmbu | Game::Nslu | Game::Nsmbudx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups() {
        let wii_u: Vec<_> = Game::ALL.into_iter().filter(|g| g.is_wii_u()).collect();
        assert_eq!(wii_u, vec![Game::Nsmbu, Game::Nslu]);
        assert!(Game::Nsmbudx.is_like_nsmbu());
        assert!(!Game::Nsmb2.is_like_nsmbu());
    }

    #[test]
    fn test_names_and_endianness() {
        assert_eq!(Game::from_name("nsmbw"), Some(Game::Nsmbw));
        assert_eq!(GameGroup::from_name("like_nsmbu"), Some(GameGroup::LikeNsmbu));
        assert_eq!(Game::Nsmbudx.endianness(), Endianness::Little);
        assert_eq!(Game::Nslu.endianness(), Endianness::Big);
        assert_eq!(Game::Nsmb2.to_string(), "New Super Mario Bros. 2");
    }
}
