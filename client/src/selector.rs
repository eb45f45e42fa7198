/// Element lookup strategies. Deliberately small: the scroll and find calls
/// need one, and the wider WebDriver strategy catalog is not this crate's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Fully-qualified widget class, e.g. `android.widget.Button`.
    ClassName(String),
    /// Raw UiAutomator `UiSelector` expression.
    UiAutomator(String),
}

impl Selector {
    pub(crate) fn strategy_and_value(&self) -> (&'static str, &str) {
        match self {
            Selector::ClassName(name) => ("class name", name),
            Selector::UiAutomator(expr) => ("-android uiautomator", expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_map_to_wire_names() {
        let by = Selector::ClassName("android.widget.Button".into());
        assert_eq!(
            by.strategy_and_value(),
            ("class name", "android.widget.Button")
        );

        let by = Selector::UiAutomator(r#"new UiSelector().text("Ok")"#.into());
        assert_eq!(by.strategy_and_value().0, "-android uiautomator");
    }
}
