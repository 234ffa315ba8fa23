/// Three-state update for an optional field.
///
/// `NoChange` keeps the stored value, `Set` replaces it and `Clear` empties
/// it. Plain `Option<T>` cannot tell "leave alone" from "clear", which
/// matters for fields like `due_date` and `completed_at`.
///
/// # Example
///
/// ```
/// use taskboard_domain::FieldUpdate;
///
/// let mut due = Some("2024-06-01".to_string());
/// FieldUpdate::<String>::NoChange.apply_to(&mut due);
/// assert_eq!(due.as_deref(), Some("2024-06-01"));
///
/// FieldUpdate::Clear.apply_to(&mut due);
/// assert_eq!(due, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    NoChange,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some` sets, `None` clears.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}
