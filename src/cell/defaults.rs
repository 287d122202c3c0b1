//! Constructors that start a cell from the empty value of its type.

use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    hash::{BuildHasher, Hash},
};

use super::{CallbackCell, ObservableCell};
use crate::subscription::subscribe::Subscribeable;

impl<T, E> ObservableCell<T, E>
where
    T: Default + Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle cell holding `T::default()`.
    pub fn with_default<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = T, ErrType = E> + 'static,
    {
        ObservableCell::new(T::default(), producer_factory)
    }
}

impl<U, E> ObservableCell<Option<U>, E>
where
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle cell holding `None`.
    pub fn optional<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = Option<U>, ErrType = E> + 'static,
    {
        ObservableCell::new(None, producer_factory)
    }
}

impl<U, E> ObservableCell<Vec<U>, E>
where
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle cell holding an empty `Vec`.
    pub fn sequence<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = Vec<U>, ErrType = E> + 'static,
    {
        ObservableCell::new(Vec::new(), producer_factory)
    }
}

impl<U, H, E> ObservableCell<HashSet<U, H>, E>
where
    U: Eq + Hash + Clone + Send + 'static,
    H: BuildHasher + Default + Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle cell holding an empty `HashSet`.
    pub fn set<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = HashSet<U, H>, ErrType = E> + 'static,
    {
        ObservableCell::new(HashSet::default(), producer_factory)
    }
}

impl<K, V, H, E> ObservableCell<HashMap<K, V, H>, E>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
    H: BuildHasher + Default + Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle cell holding an empty `HashMap`.
    pub fn mapping<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = HashMap<K, V, H>, ErrType = E> + 'static,
    {
        ObservableCell::new(HashMap::default(), producer_factory)
    }
}

impl<T> CallbackCell<T>
where
    T: Default + Clone + Send + 'static,
{
    /// Creates an idle cell holding `T::default()`.
    pub fn with_default<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = T, ErrType = Infallible> + 'static,
    {
        CallbackCell::new(T::default(), producer_factory)
    }
}

impl<U> CallbackCell<Option<U>>
where
    U: Clone + Send + 'static,
{
    /// Creates an idle cell holding `None`.
    pub fn optional<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = Option<U>, ErrType = Infallible> + 'static,
    {
        CallbackCell::new(None, producer_factory)
    }
}

impl<U> CallbackCell<Vec<U>>
where
    U: Clone + Send + 'static,
{
    /// Creates an idle cell holding an empty `Vec`.
    pub fn sequence<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = Vec<U>, ErrType = Infallible> + 'static,
    {
        CallbackCell::new(Vec::new(), producer_factory)
    }
}

impl<U, H> CallbackCell<HashSet<U, H>>
where
    U: Eq + Hash + Clone + Send + 'static,
    H: BuildHasher + Default + Clone + Send + 'static,
{
    /// Creates an idle cell holding an empty `HashSet`.
    pub fn set<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = HashSet<U, H>, ErrType = Infallible> + 'static,
    {
        CallbackCell::new(HashSet::default(), producer_factory)
    }
}

impl<K, V, H> CallbackCell<HashMap<K, V, H>>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
    H: BuildHasher + Default + Clone + Send + 'static,
{
    /// Creates an idle cell holding an empty `HashMap`.
    pub fn mapping<F, S>(producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = HashMap<K, V, H>, ErrType = Infallible> + 'static,
    {
        CallbackCell::new(HashMap::default(), producer_factory)
    }
}
