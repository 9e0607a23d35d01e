/// Builds a [`varistruct::PerVariant`] from `key = value` pairs, where a key
/// is a game (`nsmb`, `nsmbw`, `nsmb2`, `nsmbu`, `nslu`, `nsmbudx`), a group
/// (`wiiu`, `like_nsmbu`), or `default`.
///
/// ```ignore
/// varies!(nsmb = 10, nsmbw = 10, like_nsmbu = 16)
/// ```
macro_rules! varies {
    (@assign $b:ident, default, $v:expr) => { $b.default_value($v) };
    (@assign $b:ident, nsmb, $v:expr) => { $b.with($crate::Game::Nsmb, $v) };
    (@assign $b:ident, nsmbw, $v:expr) => { $b.with($crate::Game::Nsmbw, $v) };
    (@assign $b:ident, nsmb2, $v:expr) => { $b.with($crate::Game::Nsmb2, $v) };
    (@assign $b:ident, nsmbu, $v:expr) => { $b.with($crate::Game::Nsmbu, $v) };
    (@assign $b:ident, nslu, $v:expr) => { $b.with($crate::Game::Nslu, $v) };
    (@assign $b:ident, nsmbudx, $v:expr) => { $b.with($crate::Game::Nsmbudx, $v) };
    (@assign $b:ident, wiiu, $v:expr) => { $b.with_group($crate::GameGroup::WiiU, $v) };
    (@assign $b:ident, like_nsmbu, $v:expr) => { $b.with_group($crate::GameGroup::LikeNsmbu, $v) };

    ($($key:ident = $value:expr),+ $(,)?) => {{
        let builder = ::varistruct::PerVariant::<$crate::Game, _>::builder();
        $( let builder = varies!(@assign builder, $key, $value); )+
        builder.build()
    }};
}

pub(crate) use varies;
