use crate::error::{Result, TenantryError};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

type Erased = Arc<dyn Any + Send + Sync>;

/// Builds a fresh instance on every resolution.
type FactoryFn = Arc<dyn Fn(&Container) -> Result<Erased> + Send + Sync>;

/// Every binding stores an `Arc<T>` inside the erased `Arc`, so `T` may be a
/// trait object.
#[derive(Clone)]
enum Binding {
    Instance(Erased),
    Factory(FactoryFn),
}

/// Thread-safe service container keyed by type.
///
/// # Example
/// ```
/// use tenantry::di::Container;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind::<dyn Greeter, _>(|_| Ok(Arc::new(English) as Arc<dyn Greeter>));
/// assert_eq!(container.make::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
#[derive(Clone, Default)]
pub struct Container {
    bindings: DashMap<TypeId, Binding>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share one existing instance.
    pub fn instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let erased: Erased = Arc::new(instance);
        self.bindings.insert(TypeId::of::<T>(), Binding::Instance(erased));
        self
    }

    /// Resolve `T` by calling `factory` each time it is requested.
    pub fn bind<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(move |container: &Container| {
            let instance = factory(container)?;
            Ok(Arc::new(instance) as Erased)
        });
        self.bindings.insert(TypeId::of::<T>(), Binding::Factory(factory));
        self
    }

    pub fn make<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        // Clone the binding out so factories can resolve their own dependencies.
        let binding = self
            .bindings
            .get(&TypeId::of::<T>())
            .map(|entry| entry.value().clone())
            .ok_or_else(TenantryError::binding_not_found::<T>)?;

        let erased = match binding {
            Binding::Instance(instance) => instance,
            Binding::Factory(factory) => factory(self)?,
        };

        let wrapper = erased
            .downcast::<Arc<T>>()
            .map_err(|_| TenantryError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })?;
        Ok(wrapper.as_ref().clone())
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
