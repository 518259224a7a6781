use log::info;
use rand::Rng;
use uuid::Uuid;

use crate::error::{ActionError, StoreError, ValidationError};
use crate::models::Contact;
use crate::validation::parse_recipient;

/// Two-letter avatar fallback built from the first letters of the name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Address book. Addresses are normalized and validated before they are stored.
#[derive(Debug, Default, Clone)]
pub struct ContactBook {
    contacts: Vec<Contact>,
}

impl ContactBook {
    pub fn new(contacts: Vec<Contact>) -> Self {
        ContactBook { contacts }
    }

    pub fn add(&mut self, name: &str, raw_address: &str) -> Result<&Contact, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let address = parse_recipient(raw_address)?;

        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            display_name: name.to_string(),
            address,
            avatar: initials(name),
            is_online: rand::thread_rng().gen_bool(0.5),
        };
        info!("Added contact {} ({})", contact.display_name, contact.address);
        self.contacts.push(contact);
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Replaces name and address of an existing contact after validating both.
    pub fn edit(&mut self, id: &str, name: &str, raw_address: &str) -> Result<&Contact, ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let address = parse_recipient(raw_address)?;
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))?;

        contact.display_name = name.to_string();
        contact.avatar = initials(name);
        contact.address = address;
        Ok(contact)
    }

    pub fn remove(&mut self, id: &str) -> Result<Contact, StoreError> {
        let idx = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))?;
        let removed = self.contacts.remove(idx);
        info!("Removed contact {}", removed.display_name);
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn find_by_address(&self, address: &str) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.address.eq_ignore_ascii_case(address))
    }

    /// Case-insensitive match on name or address. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let query = query.to_lowercase();
        self.contacts
            .iter()
            .filter(|c| {
                c.display_name.to_lowercase().contains(&query)
                    || c.address.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalizes_address() {
        let mut book = ContactBook::default();
        let contact = book.add("  Dana Scully ", "dana").unwrap();
        assert_eq!(contact.display_name, "Dana Scully");
        assert_eq!(contact.address, "dana.eth");
        assert_eq!(contact.avatar, "DS");
    }

    #[test]
    fn test_add_rejects_bad_input_without_mutation() {
        let mut book = ContactBook::default();
        assert_eq!(book.add("   ", "dana").unwrap_err(), ValidationError::EmptyName);
        assert_eq!(
            book.add("Dana", "0x1234").unwrap_err(),
            ValidationError::InvalidRecipient("0x1234".to_string())
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_edit_and_remove() {
        let mut book = ContactBook::default();
        let id = book.add("Fox", "fox.eth").unwrap().id.clone();

        let edited = book.edit(&id, "Fox Mulder", "mulder").unwrap();
        assert_eq!(edited.address, "mulder.eth");
        assert_eq!(edited.avatar, "FM");

        assert!(book.edit(&id, "Fox", "not.valid").is_err());
        assert_eq!(book.get(&id).unwrap().address, "mulder.eth");

        assert!(book.edit("missing", "X", "x.eth").is_err());

        assert_eq!(book.remove(&id).unwrap().display_name, "Fox Mulder");
        assert_eq!(book.remove(&id), Err(StoreError::UnknownId(id)));
    }

    #[test]
    fn test_seeded_contacts_can_be_renamed() {
        let mut book = ContactBook::new(crate::fixtures::contacts());
        for contact in book.all().to_vec() {
            let renamed = book.edit(&contact.id, "Renamed", &contact.address).unwrap();
            assert_eq!(renamed.address, contact.address);
        }
    }

    #[test]
    fn test_search_matches_name_or_address() {
        let mut book = ContactBook::default();
        book.add("Alice Cooper", "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c").unwrap();
        book.add("Bob Wilson", "bob").unwrap();

        assert_eq!(book.search("alice").len(), 1);
        assert_eq!(book.search("BOB.ETH")[0].display_name, "Bob Wilson");
        assert_eq!(book.search("742D35").len(), 1);
        assert_eq!(book.search("").len(), 2);
        assert!(book.search("zed").is_empty());
    }
}
