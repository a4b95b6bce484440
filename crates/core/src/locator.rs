//! Element locators as plain data.
//!
//! A [`Locator`] describes how to find an element; resolving it against a live
//! page is the browser collaborator's job. The [`Display`](std::fmt::Display)
//! form follows Playwright's selector notation so diagnostics read the same as
//! Playwright's own errors.

use std::fmt;

/// Description of one element (or a set of elements) on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
	/// CSS selector.
	Css(String),
	/// Element labelled by `aria-label`, `aria-labelledby` or a `<label>`.
	Label { text: String, exact: bool },
	/// ARIA role with an optional accessible name.
	Role { role: String, name: Option<String>, exact: bool },
	/// Element whose `title` attribute matches.
	Title { text: String, exact: bool },
	/// Element containing the given text.
	Text { text: String, exact: bool },
	/// `inner` resolved inside the elements matched by `scope`.
	Within { scope: Box<Locator>, inner: Box<Locator> },
	/// The `index`-th (0-based) match of `base`.
	Nth { base: Box<Locator>, index: usize },
}

impl Locator {
	pub fn css(selector: impl Into<String>) -> Self {
		Self::Css(selector.into())
	}

	pub fn label(text: impl Into<String>) -> Self {
		Self::Label { text: text.into(), exact: false }
	}

	pub fn exact_label(text: impl Into<String>) -> Self {
		Self::Label { text: text.into(), exact: true }
	}

	pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
		Self::Role {
			role: role.into(),
			name: Some(name.into()),
			exact: false,
		}
	}

	pub fn exact_role(role: impl Into<String>, name: impl Into<String>) -> Self {
		Self::Role {
			role: role.into(),
			name: Some(name.into()),
			exact: true,
		}
	}

	pub fn any_role(role: impl Into<String>) -> Self {
		Self::Role {
			role: role.into(),
			name: None,
			exact: false,
		}
	}

	pub fn exact_title(text: impl Into<String>) -> Self {
		Self::Title { text: text.into(), exact: true }
	}

	pub fn text(text: impl Into<String>) -> Self {
		Self::Text { text: text.into(), exact: false }
	}

	/// Narrows `inner` to the subtree of `self`.
	pub fn locate(self, inner: Locator) -> Self {
		Self::Within {
			scope: Box::new(self),
			inner: Box::new(inner),
		}
	}

	pub fn nth(self, index: usize) -> Self {
		Self::Nth {
			base: Box::new(self),
			index,
		}
	}

	pub fn first(self) -> Self {
		self.nth(0)
	}
}

fn quoted(f: &mut fmt::Formatter<'_>, text: &str, exact: bool) -> fmt::Result {
	write!(f, "\"{}\"{}", text.replace('\\', "\\\\").replace('"', "\\\""), if exact { "s" } else { "i" })
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Locator::Css(selector) => f.write_str(selector),
			Locator::Label { text, exact } => {
				f.write_str("internal:label=")?;
				quoted(f, text, *exact)
			}
			Locator::Role { role, name, exact } => {
				write!(f, "internal:role={role}")?;
				if let Some(name) = name {
					f.write_str("[name=")?;
					quoted(f, name, *exact)?;
					f.write_str("]")?;
				}
				Ok(())
			}
			Locator::Title { text, exact } => {
				f.write_str("internal:attr=[title=")?;
				quoted(f, text, *exact)?;
				f.write_str("]")
			}
			Locator::Text { text, exact } => {
				f.write_str("internal:text=")?;
				quoted(f, text, *exact)
			}
			Locator::Within { scope, inner } => write!(f, "{scope} >> {inner}"),
			Locator::Nth { base, index } => write!(f, "{base} >> nth={index}"),
		}
	}
}
