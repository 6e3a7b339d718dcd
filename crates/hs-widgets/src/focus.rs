#![forbid(unsafe_code)]

//! Declarative focus requests.
//!
//! A [`FocusController`] turns a boolean "wants focus" flag into explicit
//! [`Focusable::focus`] calls. Focus is taken once when the owning view is
//! mounted and once more each time the flag goes from `false` to `true`.
//! Re-renders that leave the flag unchanged never steal focus back.
//!
//! ```
//! use hs_widgets::focus::{FocusController, Focusable};
//! use hs_widgets::input::TextInput;
//!
//! let mut input = TextInput::new();
//! let mut focus = FocusController::new(true);
//! assert!(focus.mount(Some(&mut input)));
//! assert!(input.is_focused());
//!
//! input.blur();
//! assert!(!focus.update(true, Some(&mut input)));
//! assert!(!input.is_focused());
//! ```

/// An element that can hold keyboard focus.
pub trait Focusable {
    /// Take keyboard focus.
    fn focus(&mut self);

    /// Give up keyboard focus.
    fn blur(&mut self);

    /// Whether the element currently holds focus.
    fn is_focused(&self) -> bool;
}

/// Delivers focus on mount and on false → true flag transitions.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    wants_focus: bool,
    mounted: bool,
    pending: bool,
    fired: u64,
}

impl FocusController {
    /// Create a controller with the initial flag value.
    pub fn new(wants_focus: bool) -> Self {
        Self {
            wants_focus,
            ..Self::default()
        }
    }

    /// Attach to a freshly created target.
    ///
    /// Returns `true` if focus was delivered. With no target the request
    /// stays pending until an [`update`](Self::update) supplies one.
    pub fn mount(&mut self, target: Option<&mut dyn Focusable>) -> bool {
        self.mounted = true;
        self.pending = self.wants_focus;
        self.deliver(target)
    }

    /// Re-evaluate after a render with the current flag value.
    ///
    /// Returns `true` if focus was delivered.
    pub fn update(&mut self, wants_focus: bool, target: Option<&mut dyn Focusable>) -> bool {
        if !self.mounted {
            self.wants_focus = wants_focus;
            return false;
        }
        if wants_focus && !self.wants_focus {
            self.pending = true;
        } else if !wants_focus {
            self.pending = false;
        }
        self.wants_focus = wants_focus;
        self.deliver(target)
    }

    /// Detach. The next [`mount`](Self::mount) evaluates the flag again.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = false;
    }

    /// Current flag value.
    #[inline]
    pub fn wants_focus(&self) -> bool {
        self.wants_focus
    }

    /// Whether a focus request is waiting for a target.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of times focus has been delivered.
    #[inline]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    fn deliver(&mut self, target: Option<&mut dyn Focusable>) -> bool {
        if !self.pending {
            return false;
        }
        let Some(target) = target else {
            return false;
        };
        target.focus();
        self.pending = false;
        self.fired += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(fired = self.fired, "focus delivered");
        true
    }
}
