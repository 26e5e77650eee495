use flock_models::ITEMS_PER_PAGE;
use rocket::{http::RawStr, request::FromFormValue};

pub mod comments;
pub mod errors;
pub mod follows;
pub mod friends;
pub mod groups;
pub mod likes;
pub mod medias;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod presence;
pub mod reports;
pub mod session;
pub mod stories;
pub mod streams;
pub mod users;
pub mod verification;

#[derive(Copy, Clone)]
pub struct Page {
    page: i32,
}

impl<'v> FromFormValue<'v> for Page {
    type Error = &'v RawStr;

    fn from_form_value(form_value: &'v RawStr) -> Result<Page, &'v RawStr> {
        form_value
            .parse::<i32>()
            .map(|page| Page { page })
            .map_err(|_| form_value)
    }
}

impl Page {
    pub fn first() -> Page {
        Page { page: 1 }
    }

    /// Computes the total number of pages needed to display n_items
    pub fn total(n_items: i32) -> i32 {
        if n_items % ITEMS_PER_PAGE == 0 {
            n_items / ITEMS_PER_PAGE
        } else {
            (n_items / ITEMS_PER_PAGE) + 1
        }
    }

    pub fn number(&self) -> i32 {
        self.page
    }

    pub fn limits(&self) -> (i32, i32) {
        ((self.page - 1) * ITEMS_PER_PAGE, self.page * ITEMS_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_totals() {
        assert_eq!(Page::total(0), 0);
        assert_eq!(Page::total(12), 1);
        assert_eq!(Page::total(13), 2);
    }

    #[test]
    fn page_limits() {
        assert_eq!(Page::first().limits(), (0, 12));
        assert_eq!(Page { page: 3 }.limits(), (24, 36));
    }
}
