use crate::transcript::Transcript;

/// Which way user messages are routed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Messages go to the language model.
    #[default]
    Normal,
    /// Messages get the canned customer care reply, the model is not called.
    CustomerCare,
}

/// Everything one session owns.
///
/// There is exactly one of these per [`Assistant`](crate::Assistant); hosts
/// serving several users keep one assistant per user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) transcript: Transcript,
    pub(crate) selected_product: Option<String>,
    pub(crate) mode: Mode,
}

impl SessionState {
    #[inline]
    pub(crate) fn new_session() -> Self {
        Self {
            transcript: Transcript::for_new_session(),
            selected_product: None,
            mode: Mode::Normal,
        }
    }

    #[inline]
    pub(crate) fn after_reset() -> Self {
        Self {
            transcript: Transcript::for_reset(),
            selected_product: None,
            mode: Mode::Normal,
        }
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the name of the selected product.
    #[inline]
    pub fn selected_product(&self) -> Option<&str> {
        self.selected_product.as_deref()
    }

    /// Returns the current routing mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` in customer care mode.
    #[inline]
    pub fn customer_care_mode(&self) -> bool {
        self.mode == Mode::CustomerCare
    }
}
