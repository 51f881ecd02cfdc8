//! Where the auth client keeps its session between page loads.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, StorageEvent, Window};

pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `sb-<project-ref>-auth-token`, where the project ref is the first label of
/// the API host.
pub fn storage_key(api_url: &str) -> String {
    let without_scheme = api_url.split_once("://").map_or(api_url, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', ':'])
        .next()
        .unwrap_or(without_scheme);
    let project_ref = host.split('.').next().unwrap_or(host);
    format!("sb-{}-auth-token", project_ref)
}

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok().flatten()
}

/// The browser's `localStorage`.
pub struct LocalStorage;

impl SessionStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match local_storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("Could not persist the auth session");
                }
            }
            None => log::warn!("localStorage is unavailable; the session will not survive a reload"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Forwards `storage` events for one key, i.e. session changes made in other
/// tabs. The listener is removed on drop.
pub struct TabSync {
    window: Window,
    callback: Closure<dyn FnMut(StorageEvent)>,
}

impl TabSync {
    pub fn install(key: String, on_change: impl Fn(Option<String>) + 'static) -> Option<Self> {
        let window = window()?;
        let callback = Closure::wrap(Box::new(move |event: StorageEvent| {
            if event.key().as_deref() == Some(key.as_str()) {
                on_change(event.new_value());
            }
        }) as Box<dyn FnMut(StorageEvent)>);

        if window
            .add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for session changes in other tabs");
            return None;
        }
        Some(Self { window, callback })
    }
}

impl Drop for TabSync {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("storage", self.callback.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
pub mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::SessionStorage;

    #[derive(Default)]
    pub struct MemoryStorage {
        items: RefCell<HashMap<String, String>>,
    }

    impl SessionStorage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.items.borrow_mut().insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.items.borrow_mut().remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_the_project_ref() {
        assert_eq!(storage_key("https://abcdefgh.supabase.co"), "sb-abcdefgh-auth-token");
        assert_eq!(storage_key("https://abcdefgh.supabase.co/"), "sb-abcdefgh-auth-token");
        assert_eq!(storage_key("http://localhost:54321"), "sb-localhost-auth-token");
        assert_eq!(storage_key("http://127.0.0.1:54321"), "sb-127-auth-token");
    }
}
