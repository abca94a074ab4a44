use uuid::Uuid;

/// `CallerContext` carries what the authentication layer knows about the caller
/// of a single request: who they are and which timezone they prefer.
///
/// Both parts are optional. A missing timezone means "no preference" and a
/// missing id means "unauthenticated"; neither is an error by itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    caller_id: Option<Uuid>,
    caller_timezone: Option<String>,
}

impl CallerContext {
    /// Create a new `CallerContext` builder
    #[must_use]
    pub fn builder() -> CallerContextBuilder {
        CallerContextBuilder::default()
    }

    /// Context with neither identity nor timezone preference
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn caller_id(&self) -> Option<Uuid> {
        self.caller_id
    }

    /// Preferred IANA timezone name, if the caller has a non-empty one.
    #[must_use]
    pub fn caller_timezone(&self) -> Option<&str> {
        self.caller_timezone.as_deref().filter(|tz| !tz.is_empty())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.caller_id.is_some()
    }
}

#[derive(Default)]
pub struct CallerContextBuilder {
    caller_id: Option<Uuid>,
    caller_timezone: Option<String>,
}

impl CallerContextBuilder {
    #[must_use]
    pub fn caller_id(mut self, caller_id: Uuid) -> Self {
        self.caller_id = Some(caller_id);
        self
    }

    #[must_use]
    pub fn caller_timezone(mut self, timezone: &str) -> Self {
        self.caller_timezone = Some(timezone.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> CallerContext {
        CallerContext {
            caller_id: self.caller_id,
            caller_timezone: self.caller_timezone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_context_builder_full() {
        let id = Uuid::new_v4();
        let ctx = CallerContext::builder()
            .caller_id(id)
            .caller_timezone("Europe/Riga")
            .build();

        assert_eq!(ctx.caller_id(), Some(id));
        assert_eq!(ctx.caller_timezone(), Some("Europe/Riga"));
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn test_caller_context_anonymous() {
        let ctx = CallerContext::anonymous();

        assert_eq!(ctx.caller_id(), None);
        assert_eq!(ctx.caller_timezone(), None);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_empty_timezone_is_no_preference() {
        let ctx = CallerContext::builder().caller_timezone("").build();
        assert_eq!(ctx.caller_timezone(), None);
    }
}
