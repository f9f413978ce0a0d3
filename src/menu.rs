use log::warn;

/// Sidebar entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOption {
    Homepage,
    RestingBloodPressure,
    CholesterolSerum,
    ChestPainType,
    DownloadData,
}

impl MenuOption {
    pub const ALL: [MenuOption; 5] = [
        MenuOption::Homepage,
        MenuOption::RestingBloodPressure,
        MenuOption::CholesterolSerum,
        MenuOption::ChestPainType,
        MenuOption::DownloadData,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Homepage => "Homepage",
            MenuOption::RestingBloodPressure => "Predict by Resting Blood Pressure",
            MenuOption::CholesterolSerum => "Predict by Cholesterol Serum",
            MenuOption::ChestPainType => "Predict by Chest Pain Type",
            MenuOption::DownloadData => "Download Data",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            MenuOption::Homepage => "homepage",
            MenuOption::RestingBloodPressure => "resting-bp",
            MenuOption::CholesterolSerum => "cholesterol",
            MenuOption::ChestPainType => "chest-pain",
            MenuOption::DownloadData => "download",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Known(MenuOption),
    Unrecognized(String),
}

impl Selection {
    /// Matches a menu label or slug exactly.
    pub fn parse(value: &str) -> Selection {
        MenuOption::ALL
            .into_iter()
            .find(|option| option.label() == value || option.slug() == value)
            .map(Selection::Known)
            .unwrap_or_else(|| Selection::Unrecognized(value.to_string()))
    }

    /// A request without a selection shows the first menu entry.
    pub fn from_query(value: Option<&str>) -> Selection {
        match value {
            Some(value) => Selection::parse(value),
            None => Selection::Known(MenuOption::Homepage),
        }
    }

    /// Picks the page to render. Unrecognized selections get the download page.
    pub fn resolve(&self) -> MenuOption {
        match self {
            Selection::Known(option) => *option,
            Selection::Unrecognized(value) => {
                warn!("unrecognized menu selection {value:?}, showing {}", MenuOption::DownloadData.label());
                MenuOption::DownloadData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_parse_to_their_option() {
        for option in MenuOption::ALL {
            assert_eq!(Selection::parse(option.label()), Selection::Known(option));
            assert_eq!(Selection::parse(option.slug()), Selection::Known(option));
        }
    }

    #[test]
    fn menu_has_five_exact_labels() {
        let labels: Vec<&str> = MenuOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Homepage",
                "Predict by Resting Blood Pressure",
                "Predict by Cholesterol Serum",
                "Predict by Chest Pain Type",
                "Download Data",
            ]
        );
    }

    #[test]
    fn unrecognized_selection_resolves_to_download() {
        let selection = Selection::parse("Predict by Moon Phase");
        assert_eq!(selection, Selection::Unrecognized("Predict by Moon Phase".to_string()));
        assert_eq!(selection.resolve(), MenuOption::DownloadData);
        assert_eq!(Selection::parse("homepage ").resolve(), MenuOption::DownloadData);
    }

    #[test]
    fn missing_selection_is_homepage() {
        assert_eq!(Selection::from_query(None).resolve(), MenuOption::Homepage);
    }
}
