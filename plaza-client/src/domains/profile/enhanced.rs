//! Editing of the array-valued "about" sections.

use plaza_core::user_management::{SECTION_ITEM_LIMIT, profile_rules};
use plaza_core::{ProfileError, Result};
use plaza_model::{
    EducationEntry, EnhancedProfile, InterestEntry, ItemId, LanguageEntry,
    ProfileLink, ProfileSection, UpdateEnhancedProfileRequest, Visibility,
    WorkEntry,
};

/// An item of any enhanced section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionItem {
    Work(WorkEntry),
    Education(EducationEntry),
    Link(ProfileLink),
    Language(LanguageEntry),
    Interest(InterestEntry),
}

impl SectionItem {
    pub fn section(&self) -> ProfileSection {
        match self {
            Self::Work(_) => ProfileSection::Work,
            Self::Education(_) => ProfileSection::Education,
            Self::Link(_) => ProfileSection::Links,
            Self::Language(_) => ProfileSection::Languages,
            Self::Interest(_) => ProfileSection::Interests,
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            Self::Work(e) => e.id,
            Self::Education(e) => e.id,
            Self::Link(e) => e.id,
            Self::Language(e) => e.id,
            Self::Interest(e) => e.id,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Work(e) => {
                profile_rules::required_label("company", &e.company)?;
                profile_rules::required_label("title", &e.title)?;
                let end = if e.current { None } else { e.end_year };
                profile_rules::year_range(e.start_year, end)
            }
            Self::Education(e) => {
                profile_rules::required_label("school", &e.school)?;
                profile_rules::year_range(e.start_year, e.end_year)
            }
            Self::Link(e) => {
                profile_rules::required_label("label", &e.label)?;
                profile_rules::link_url(&e.url)
            }
            Self::Language(e) => profile_rules::required_label("language", &e.name),
            Self::Interest(e) => profile_rules::required_label("interest", &e.name),
        }
    }
}

/// Typed access to the vector backing each section.
trait SectionEntry: Sized {
    fn entry_id(&self) -> ItemId;
    fn into_item(self) -> SectionItem;
    fn from_item(item: SectionItem) -> Option<Self>;
}

macro_rules! section_entry {
    ($ty:ty, $variant:ident) => {
        impl SectionEntry for $ty {
            fn entry_id(&self) -> ItemId {
                self.id
            }

            fn into_item(self) -> SectionItem {
                SectionItem::$variant(self)
            }

            fn from_item(item: SectionItem) -> Option<Self> {
                match item {
                    SectionItem::$variant(entry) => Some(entry),
                    _ => None,
                }
            }
        }
    };
}

section_entry!(WorkEntry, Work);
section_entry!(EducationEntry, Education);
section_entry!(ProfileLink, Link);
section_entry!(LanguageEntry, Language);
section_entry!(InterestEntry, Interest);

/// Run `$body` with `$items` bound to the vector behind `$section`.
macro_rules! with_section {
    ($profile:expr, $section:expr, |$items:ident| $body:expr) => {
        match $section {
            ProfileSection::Work => {
                let $items = &mut $profile.work;
                $body
            }
            ProfileSection::Education => {
                let $items = &mut $profile.education;
                $body
            }
            ProfileSection::Links => {
                let $items = &mut $profile.links;
                $body
            }
            ProfileSection::Languages => {
                let $items = &mut $profile.languages;
                $body
            }
            ProfileSection::Interests => {
                let $items = &mut $profile.interests;
                $body
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancedEditor {
    profile: EnhancedProfile,
}

impl EnhancedEditor {
    pub fn new(profile: EnhancedProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &EnhancedProfile {
        &self.profile
    }

    /// Append a validated item. Fails once the section holds
    /// [`SECTION_ITEM_LIMIT`] items.
    pub fn add(&mut self, item: SectionItem) -> Result<ItemId> {
        let section = item.section();
        if self.profile.len(section) >= SECTION_ITEM_LIMIT {
            return Err(ProfileError::SectionFull {
                section,
                limit: SECTION_ITEM_LIMIT,
            });
        }
        item.validate()?;
        let id = item.id();
        with_section!(self.profile, section, |items| push(items, item));
        Ok(id)
    }

    /// Replace the item sharing `item`'s id.
    pub fn update(&mut self, item: SectionItem) -> Result<()> {
        item.validate()?;
        let (section, id) = (item.section(), item.id());
        let replaced =
            with_section!(self.profile, section, |items| replace(items, item));
        if replaced {
            Ok(())
        } else {
            Err(ProfileError::ItemNotFound { section, id })
        }
    }

    pub fn remove(
        &mut self,
        section: ProfileSection,
        id: ItemId,
    ) -> Result<SectionItem> {
        with_section!(self.profile, section, |items| take(items, id))
            .ok_or(ProfileError::ItemNotFound { section, id })
    }

    /// Move the item at `from` so it ends up at index `to`.
    pub fn move_item(
        &mut self,
        section: ProfileSection,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let len = self.profile.len(section);
        if from >= len || to >= len {
            return Err(ProfileError::invalid(
                "position",
                format!("{section} has {len} items"),
            ));
        }
        with_section!(self.profile, section, |items| {
            let item = items.remove(from);
            items.insert(to, item);
        });
        Ok(())
    }

    /// Flip an item between visible and only-me; returns the new value.
    pub fn toggle_item_visibility(
        &mut self,
        section: ProfileSection,
        id: ItemId,
    ) -> Result<Visibility> {
        let current = self
            .profile
            .item_visibility(section, id)
            .ok_or(ProfileError::ItemNotFound { section, id })?;
        let next = current.toggle();
        self.profile.set_item_visibility(section, id, next);
        Ok(next)
    }

    /// Check every item, reporting the first broken one.
    pub fn validate(&self) -> Result<()> {
        let profile = &self.profile;
        let items = profile
            .work
            .iter()
            .cloned()
            .map(SectionItem::Work)
            .chain(profile.education.iter().cloned().map(SectionItem::Education))
            .chain(profile.links.iter().cloned().map(SectionItem::Link))
            .chain(profile.languages.iter().cloned().map(SectionItem::Language))
            .chain(profile.interests.iter().cloned().map(SectionItem::Interest));
        for item in items {
            item.validate()?;
        }
        Ok(())
    }

    pub fn into_request(self) -> Result<UpdateEnhancedProfileRequest> {
        self.validate()?;
        Ok(self.profile.into())
    }
}

fn push<T: SectionEntry>(items: &mut Vec<T>, item: SectionItem) {
    if let Some(entry) = T::from_item(item) {
        items.push(entry);
    }
}

fn replace<T: SectionEntry>(items: &mut [T], item: SectionItem) -> bool {
    let Some(entry) = T::from_item(item) else {
        return false;
    };
    match items.iter_mut().find(|e| e.entry_id() == entry.entry_id()) {
        Some(slot) => {
            *slot = entry;
            true
        }
        None => false,
    }
}

fn take<T: SectionEntry>(items: &mut Vec<T>, id: ItemId) -> Option<SectionItem> {
    let index = items.iter().position(|e| e.entry_id() == id)?;
    Some(items.remove(index).into_item())
}
