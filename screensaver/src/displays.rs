//! Decides which displays receive a player instance.
//!
//! Displays are identified by the index the player understands for `--fs-screen`.

/// Which displays were asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySelection {
    /// Exactly these displays.
    Indices(Vec<u32>),
    /// Every connected output.
    All,
}

impl Default for DisplaySelection {
    fn default() -> Self {
        Self::Indices(vec![0])
    }
}

/// Turns a [`DisplaySelection`] into the list of displays to launch on.
///
/// Explicit indices keep their order, repeated ones are dropped.
/// The returned list is never empty: if nothing usable is found, display `0` is used.
pub fn resolve(selection: &DisplaySelection) -> Vec<u32> {
    let mut result = Vec::new();
    match selection {
        DisplaySelection::Indices(indices) => {
            for index in indices {
                if !result.contains(index) {
                    result.push(*index);
                }
            }
        }
        DisplaySelection::All => result = enumerate(),
    }
    if result.is_empty() {
        log::warn!("no usable display found, falling back to display 0");
        result.push(0);
    }
    result
}

/// Lists connected outputs, primary output first.
#[cfg(feature = "detect")]
fn enumerate() -> Vec<u32> {
    match display_info::DisplayInfo::all() {
        Ok(list) => {
            let mut indices: Vec<u32> = (0..).zip(&list).map(|(index, _)| index).collect();
            if let Some(primary) = list.iter().position(|info| info.is_primary) {
                indices[..=primary].rotate_right(1);
            }
            for info in &list {
                log::debug!(
                    "found display {} ({}x{} at {},{})",
                    info.name,
                    info.width,
                    info.height,
                    info.x,
                    info.y
                );
            }
            indices
        }
        Err(err) => {
            log::warn!("cannot enumerate displays: {err}");
            Vec::new()
        }
    }
}

#[cfg(not(feature = "detect"))]
fn enumerate() -> Vec<u32> {
    log::warn!("built without display detection, `display all` only covers display 0");
    Vec::new()
}
