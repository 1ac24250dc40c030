use std::ops::{Deref, DerefMut};

/// Owns a value for the length of a scope and hands it to `on_release` when
/// dropped, whichever way the scope is left.
pub struct Scoped<T, F = Box<dyn FnOnce(T) + Send>>
where
    F: FnOnce(T),
{
    value: Option<T>,
    on_release: Option<F>,
}

impl<T, F> Scoped<T, F>
where
    F: FnOnce(T),
{
    pub fn new(value: T, on_release: F) -> Self {
        Self {
            value: Some(value),
            on_release: Some(on_release),
        }
    }
}

impl<T> Scoped<T> {
    pub fn boxed<F>(value: T, on_release: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self::new(value, Box::new(on_release))
    }
}

impl<T, F> Deref for Scoped<T, F>
where
    F: FnOnce(T),
{
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("Scoped value already released")
    }
}

impl<T, F> DerefMut for Scoped<T, F>
where
    F: FnOnce(T),
{
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("Scoped value already released")
    }
}

impl<T, F> std::fmt::Debug for Scoped<T, F>
where
    T: std::fmt::Debug,
    F: FnOnce(T),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoped").field("value", &self.value).finish()
    }
}

impl<T, F> Drop for Scoped<T, F>
where
    F: FnOnce(T),
{
    fn drop(&mut self) {
        if let (Some(value), Some(on_release)) = (self.value.take(), self.on_release.take()) {
            on_release(value);
        }
    }
}
