use std::collections::BTreeMap;
use std::fmt;

/// Audience a profile field or item is shown to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Visibility {
    #[default]
    Public,
    Friends,
    OnlyMe,
}

impl Visibility {
    pub const ALL: [Self; 3] = [Self::Public, Self::Friends, Self::OnlyMe];

    /// The eye-icon toggle: anything shown becomes hidden, hidden becomes public.
    pub fn toggle(self) -> Self {
        match self {
            Self::Public | Self::Friends => Self::OnlyMe,
            Self::OnlyMe => Self::Public,
        }
    }

    pub fn is_hidden(self) -> bool {
        matches!(self, Self::OnlyMe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Friends => "friends",
            Self::OnlyMe => "only_me",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "public" => Ok(Self::Public),
            "friends" => Ok(Self::Friends),
            "only_me" | "private" => Ok(Self::OnlyMe),
            other => Err(format!("unknown visibility '{other}'")),
        }
    }
}

/// Basic profile fields that carry their own visibility setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProfileField {
    DisplayName,
    Username,
    Bio,
    Website,
    Location,
    Birthday,
    Email,
    Phone,
    Gender,
    Pronouns,
}

impl ProfileField {
    pub const ALL: [Self; 10] = [
        Self::DisplayName,
        Self::Username,
        Self::Bio,
        Self::Website,
        Self::Location,
        Self::Birthday,
        Self::Email,
        Self::Phone,
        Self::Gender,
        Self::Pronouns,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::DisplayName => "display_name",
            Self::Username => "username",
            Self::Bio => "bio",
            Self::Website => "website",
            Self::Location => "location",
            Self::Birthday => "birthday",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Gender => "gender",
            Self::Pronouns => "pronouns",
        }
    }

    /// Identity fields are always public; everything else can be hidden.
    pub fn is_hideable(self) -> bool {
        !matches!(self, Self::DisplayName | Self::Username)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| format!("unknown profile field '{s}'"))
    }
}

/// Per-field visibility map. Fields without an entry are public.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FieldVisibility(BTreeMap<ProfileField, Visibility>);

impl FieldVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ProfileField) -> Visibility {
        if !field.is_hideable() {
            return Visibility::Public;
        }
        self.0.get(&field).copied().unwrap_or_default()
    }

    /// Store a visibility, returning the previous effective value.
    pub fn set(
        &mut self,
        field: ProfileField,
        visibility: Visibility,
    ) -> Visibility {
        let previous = self.get(field);
        if visibility == Visibility::Public {
            self.0.remove(&field);
        } else {
            self.0.insert(field, visibility);
        }
        previous
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, Visibility)> + '_ {
        self.0.iter().map(|(field, vis)| (*field, *vis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_hides_shown_and_reveals_hidden() {
        assert_eq!(Visibility::Public.toggle(), Visibility::OnlyMe);
        assert_eq!(Visibility::Friends.toggle(), Visibility::OnlyMe);
        assert_eq!(Visibility::OnlyMe.toggle(), Visibility::Public);
    }

    #[test]
    fn missing_fields_default_to_public() {
        let mut map = FieldVisibility::new();
        assert_eq!(map.get(ProfileField::Email), Visibility::Public);

        let previous = map.set(ProfileField::Email, Visibility::OnlyMe);
        assert_eq!(previous, Visibility::Public);
        assert_eq!(map.get(ProfileField::Email), Visibility::OnlyMe);

        map.set(ProfileField::Email, Visibility::Public);
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn identity_fields_read_as_public() {
        let mut map = FieldVisibility::new();
        map.set(ProfileField::Username, Visibility::OnlyMe);
        assert_eq!(map.get(ProfileField::Username), Visibility::Public);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("only-me".parse::<Visibility>(), Ok(Visibility::OnlyMe));
        assert_eq!("Private".parse::<Visibility>(), Ok(Visibility::OnlyMe));
        assert_eq!(
            "display-name".parse::<ProfileField>(),
            Ok(ProfileField::DisplayName)
        );
        assert!("shoe_size".parse::<ProfileField>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_snake_case_object() {
        let mut map = FieldVisibility::new();
        map.set(ProfileField::Phone, Visibility::Friends);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"phone":"friends"}"#);
    }
}
