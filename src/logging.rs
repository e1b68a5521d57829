//! Debug tracing: `cfg(debug_assertions)`-gated `println!`-shaped visibility
//! rather than an external logging crate, with a leveled `Log<T>`
//! (`None`/`Default`/`Verbose`) for the two tiers this crate's two hot
//! tracing spots — the tokenizer's reference-mode scanner and the parser's
//! collection-operator dispatch — actually use. `Default` prints the detail
//! with `{:?}`; `Verbose` pretty-prints it with `{:#?}`.

use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Verbose(s) => write!(f, "{}", s),
        }
    }
}

/// Trace a single pipeline event at the given [`Log`] level. A no-op in
/// release builds, and a no-op for [`Log::None`] in debug builds too.
pub fn trace<T: Debug>(site: &'static str, level: Log<T>) {
    #[cfg(debug_assertions)]
    match &level {
        Log::None => {}
        Log::Default(detail) => eprintln!("[jsonmap; {}]: {:?}", site, detail),
        Log::Verbose(detail) => eprintln!("[jsonmap; {}]: {:#?}", site, detail),
    }
    #[cfg(not(debug_assertions))]
    let _ = (site, &level);
}
