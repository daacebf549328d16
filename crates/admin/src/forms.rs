//! Admin form fields, posted data and field validation.
//!
//! Every change form is a list of [`FormField`]s rendered by one template.
//! Submissions arrive as [`FormData`] and are checked with a [`Validator`],
//! which collects messages per field instead of stopping at the first.

use std::collections::HashMap;

use chrono::NaiveDate;

use little_lemon_core::{OrderStatus, Price, ReservationSlot, SlotError, Slug, Username};
use little_lemon_restaurant::forms::{
    FieldErrors, INVALID_DATE, NOT_A_WHOLE_NUMBER, REQUIRED, SLOT_OUT_OF_RANGE, non_blank, parse_date,
};

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Decimal,
    Date,
    Checkbox,
    Select,
    Password,
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Create a new option.
    #[must_use]
    pub fn new(value: impl ToString, label: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// A rendered form field with its current value and errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    pub max_length: Option<usize>,
    pub options: Vec<SelectOption>,
    pub help: Option<String>,
    pub errors: Vec<String>,
}

impl FormField {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value: String::new(),
            required: true,
            max_length: None,
            options: vec![],
            help: None,
            errors: vec![],
        }
    }

    /// Single-line text input limited to `max_length` characters.
    #[must_use]
    pub fn text(name: &str, label: &str, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::new(name, label, FieldKind::Text)
        }
    }

    /// Multi-line text input limited to `max_length` characters.
    #[must_use]
    pub fn textarea(name: &str, label: &str, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::new(name, label, FieldKind::TextArea)
        }
    }

    /// Whole-number input.
    #[must_use]
    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    /// Money input.
    #[must_use]
    pub fn decimal(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Decimal)
    }

    /// Date input.
    #[must_use]
    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// Checkbox; never required.
    #[must_use]
    pub fn checkbox(name: &str, label: &str) -> Self {
        Self {
            required: false,
            ..Self::new(name, label, FieldKind::Checkbox)
        }
    }

    /// Select box over `options`.
    #[must_use]
    pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::Select)
        }
    }

    /// Password input; its value is never echoed back.
    #[must_use]
    pub fn password(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    /// Mark the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach help text shown under the input.
    #[must_use]
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Fill the value and errors from a submission.
    #[must_use]
    pub fn bind(mut self, data: &FormData, errors: &FieldErrors) -> Self {
        if self.kind != FieldKind::Password {
            self.value = data.raw(&self.name).to_string();
        }
        self.errors = errors.get(&self.name).to_vec();
        self
    }

    /// `type` attribute for `<input>` fields.
    #[must_use]
    pub const fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Number => "number",
            FieldKind::Decimal => "text",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Password => "password",
            FieldKind::Text | FieldKind::TextArea | FieldKind::Select => "text",
        }
    }

    #[must_use]
    pub fn is_select(&self) -> bool {
        self.kind == FieldKind::Select
    }

    #[must_use]
    pub fn is_textarea(&self) -> bool {
        self.kind == FieldKind::TextArea
    }

    #[must_use]
    pub fn is_checkbox(&self) -> bool {
        self.kind == FieldKind::Checkbox
    }

    /// Whether a checkbox is ticked.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        is_truthy(&self.value)
    }

    /// Whether `value` is the selected option.
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.value == value
    }
}

/// A submitted form, keyed by field name.
///
/// Unchecked checkboxes are simply absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    /// Create an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier one.
    pub fn insert(&mut self, name: &str, value: impl ToString) {
        self.0.insert(name.to_string(), value.to_string());
    }

    /// Builder form of [`FormData::insert`].
    #[must_use]
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a checkbox value.
    pub fn insert_checkbox(&mut self, name: &str, checked: bool) {
        if checked {
            self.insert(name, "on");
        } else {
            self.0.remove(name);
        }
    }

    /// The submitted value, trimmed; `None` when missing or blank.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        non_blank(self.0.get(name).map(String::as_str))
    }

    /// The submitted value as typed (empty when missing).
    #[must_use]
    pub fn raw(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| is_truthy(v))
    }

    /// Fields whose name starts with `prefix`, with the prefix removed.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0.iter().filter_map(move |(name, value)| {
            name.strip_prefix(prefix)
                .map(|rest| (rest, value.as_str()))
        })
    }
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "on" | "true" | "1")
}

/// Field-by-field parser that accumulates error messages.
pub struct Validator<'a> {
    data: &'a FormData,
    errors: FieldErrors,
}

impl<'a> Validator<'a> {
    /// Start validating `data`.
    #[must_use]
    pub fn new(data: &'a FormData) -> Self {
        Self {
            data,
            errors: FieldErrors::new(),
        }
    }

    fn require(&mut self, name: &str) -> Option<&'a str> {
        let value = self.data.get(name);
        if value.is_none() {
            self.errors.add(name, REQUIRED);
        }
        value
    }

    /// Record a message for `name`.
    pub fn error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.add(name, message);
    }

    /// Required text of at most `max_length` characters.
    pub fn text(&mut self, name: &str, max_length: usize) -> Option<String> {
        let value = self.require(name)?;
        let length = value.chars().count();
        if length > max_length {
            self.errors.add(
                name,
                format!("Ensure this value has at most {max_length} characters (it has {length})."),
            );
            return None;
        }
        Some(value.to_string())
    }

    /// Required slug.
    pub fn slug(&mut self, name: &str) -> Option<Slug> {
        let value = self.require(name)?;
        Slug::parse(value)
            .map_err(|_| {
                self.errors.add(
                    name,
                    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                );
            })
            .ok()
    }

    /// Required username.
    pub fn username(&mut self, name: &str) -> Option<Username> {
        let value = self.require(name)?;
        Username::parse(value)
            .map_err(|e| self.errors.add(name, sentence(&e.to_string())))
            .ok()
    }

    /// Required price.
    pub fn price(&mut self, name: &str) -> Option<Price> {
        let value = self.require(name)?;
        Price::parse(value)
            .map_err(|e| self.errors.add(name, sentence(&e.to_string())))
            .ok()
    }

    /// Required ISO date.
    pub fn date(&mut self, name: &str) -> Option<NaiveDate> {
        let value = self.require(name)?;
        let date = parse_date(value);
        if date.is_none() {
            self.errors.add(name, INVALID_DATE);
        }
        date
    }

    /// Required reservation slot.
    pub fn slot(&mut self, name: &str) -> Option<ReservationSlot> {
        match self.data.raw(name).parse::<ReservationSlot>() {
            Ok(slot) => Some(slot),
            Err(SlotError::Empty) => {
                self.errors.add(name, REQUIRED);
                None
            }
            Err(SlotError::NotANumber) => {
                self.errors.add(name, NOT_A_WHOLE_NUMBER);
                None
            }
            Err(SlotError::OutOfRange { .. }) => {
                self.errors.add(name, SLOT_OUT_OF_RANGE);
                None
            }
        }
    }

    /// Required non-negative whole number.
    pub fn quantity(&mut self, name: &str) -> Option<u32> {
        let value = self.require(name)?;
        match value.parse::<i64>() {
            Ok(n) if n < 0 => {
                self.errors
                    .add(name, "Ensure this value is greater than or equal to 0.");
                None
            }
            Ok(n) => u32::try_from(n)
                .map_err(|_| self.errors.add(name, "Ensure this value is smaller."))
                .ok(),
            Err(_) => {
                self.errors.add(name, NOT_A_WHOLE_NUMBER);
                None
            }
        }
    }

    /// Required reference to another record's ID.
    pub fn id(&mut self, name: &str) -> Option<i64> {
        let value = self.require(name)?;
        value
            .parse::<i64>()
            .map_err(|_| {
                self.errors.add(
                    name,
                    "Select a valid choice. That choice is not one of the available choices.",
                );
            })
            .ok()
    }

    /// Optional reference to another record's ID (`Some(None)` when blank).
    pub fn optional_id(&mut self, name: &str) -> Option<Option<i64>> {
        match self.data.get(name) {
            None => Some(None),
            Some(_) => self.id(name).map(Some),
        }
    }

    /// Checkbox value.
    #[must_use]
    pub fn checkbox(&self, name: &str) -> bool {
        self.data.checked(name)
    }

    /// Required order status.
    pub fn status(&mut self, name: &str) -> Option<OrderStatus> {
        let value = self.require(name)?;
        let status = OrderStatus::from_str_param(value);
        if status.is_none() {
            self.errors.add(
                name,
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }
        status
    }

    /// Finish with `value` if nothing failed, else the collected errors.
    ///
    /// # Errors
    ///
    /// Returns the collected messages when any check failed or `value` is
    /// `None`.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, FieldErrors> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            Some(_) => Err(self.errors),
            None => {
                let mut errors = self.errors;
                if errors.is_empty() {
                    errors.add(FieldErrors::FORM, "Please correct the errors below.");
                }
                Err(errors)
            }
        }
    }
}

/// Capitalize and terminate a lowercase error message.
pub(crate) fn sentence(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut s: String = first.to_uppercase().chain(chars).collect();
        if !s.ends_with('.') {
            s.push('.');
        }
        s
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_data_treats_blank_as_missing() {
        let data = FormData::new().with("title", "  ").with("slug", " food ");
        assert_eq!(data.get("title"), None);
        assert_eq!(data.raw("title"), "  ");
        assert_eq!(data.get("slug"), Some("food"));
        assert!(!data.checked("featured"));
    }

    #[test]
    fn test_with_prefix() {
        let data = FormData::new()
            .with("title-1", "Starters")
            .with("title-2", "Mains")
            .with("q", "x");
        let mut pairs: Vec<_> = data.with_prefix("title-").collect();
        pairs.sort_unstable();
        assert_eq!(pairs, [("1", "Starters"), ("2", "Mains")]);
    }

    #[test]
    fn test_validator_collects_every_error() {
        let data = FormData::new()
            .with("price", "1.999")
            .with("quantity", "-2")
            .with("date", "tomorrow");
        let mut v = Validator::new(&data);
        let title = v.text("title", 255);
        let price = v.price("price");
        let quantity = v.quantity("quantity");
        let date = v.date("date");
        assert!(title.is_none() && price.is_none() && quantity.is_none() && date.is_none());

        let errors = v.finish(Some(())).unwrap_err();
        assert_eq!(errors.get("title"), [REQUIRED]);
        assert!(errors.message("price").starts_with("Ensure that there are no more than 2"));
        assert!(errors.message("quantity").contains("greater than or equal to 0"));
        assert_eq!(errors.message("date"), INVALID_DATE);
    }

    #[test]
    fn test_validator_accepts_valid_input() {
        let data = FormData::new()
            .with("title", "Greek Salad")
            .with("price", "12.50")
            .with("featured", "on")
            .with("status", "delivered")
            .with("crew", "");
        let mut v = Validator::new(&data);
        let title = v.text("title", 255);
        let price = v.price("price");
        let featured = v.checkbox("featured");
        let status = v.status("status");
        let crew = v.optional_id("crew");
        let value = title.zip(price).zip(status).zip(crew);
        let (((title, price), status), crew) = v.finish(value).unwrap();

        assert_eq!(title, "Greek Salad");
        assert_eq!(price.to_string(), "12.50");
        assert!(featured);
        assert_eq!(status, OrderStatus::Delivered);
        assert_eq!(crew, None);
    }

    #[test]
    fn test_text_length_limit_message() {
        let data = FormData::new().with("title", "a".repeat(256));
        let mut v = Validator::new(&data);
        assert!(v.text("title", 255).is_none());
        let errors = v.finish(Some(())).unwrap_err();
        assert_eq!(
            errors.message("title"),
            "Ensure this value has at most 255 characters (it has 256)."
        );
    }

    #[test]
    fn test_slot_messages_match_booking_form() {
        let data = FormData::new()
            .with("low", "-1")
            .with("high", "40000")
            .with("word", "noon")
            .with("ok", "12");
        let mut v = Validator::new(&data);
        assert!(v.slot("low").is_none());
        assert!(v.slot("high").is_none());
        assert!(v.slot("word").is_none());
        assert_eq!(v.slot("ok").map(|s| s.get()), Some(12));

        let errors = v.finish(Some(())).unwrap_err();
        assert_eq!(errors.get("low"), [SLOT_OUT_OF_RANGE]);
        assert_eq!(errors.get("high"), [SLOT_OUT_OF_RANGE]);
        assert_eq!(errors.get("word"), [NOT_A_WHOLE_NUMBER]);
    }

    #[test]
    fn test_bind_hides_passwords() {
        let data = FormData::new().with("username", "mario").with("password", "secret123");
        let mut errors = FieldErrors::new();
        errors.add("username", "taken");

        let username = FormField::text("username", "Username", 150).bind(&data, &errors);
        assert_eq!(username.value, "mario");
        assert_eq!(username.errors, ["taken"]);

        let password = FormField::password("password", "Password").bind(&data, &errors);
        assert_eq!(password.value, "");
    }
}
