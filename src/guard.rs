//! In-progress resolution tracking, used to fail fast on dependency cycles.

use std::cell::RefCell;

use crate::{any::TypeInfo, errors::ResolveErrorKind};

thread_local! {
    // Keys currently being resolved on this thread, tagged with the injector that resolves them.
    static RESOLVING_STACK: RefCell<Vec<(usize, TypeInfo)>> = const { RefCell::new(Vec::new()) };
}

/// Pushes a key on the resolution stack for as long as it lives.
pub(crate) struct ResolutionGuard {
    injector_id: usize,
}

impl ResolutionGuard {
    pub(crate) fn enter(injector_id: usize, type_info: TypeInfo, max_depth: usize) -> Result<Self, ResolveErrorKind> {
        RESOLVING_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            let mut path = stack
                .iter()
                .filter(|(id, _)| *id == injector_id)
                .map(|(_, type_info)| *type_info)
                .skip_while(|resolving| *resolving != type_info)
                .peekable();
            if path.peek().is_some() {
                let mut path: Vec<_> = path.collect();
                path.push(type_info);
                return Err(ResolveErrorKind::CyclicDependency { path: path.into() });
            }

            let depth = stack.iter().filter(|(id, _)| *id == injector_id).count();
            if depth >= max_depth {
                return Err(ResolveErrorKind::DepthExceeded { type_info, depth });
            }

            stack.push((injector_id, type_info));
            Ok(Self { injector_id })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().rposition(|(id, _)| *id == self.injector_id) {
                stack.remove(position);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::ResolutionGuard;
    use crate::{any::TypeInfo, errors::ResolveErrorKind};

    struct A;
    struct B;

    #[test]
    fn test_cycle_reports_path() {
        let a = TypeInfo::of::<A>();
        let b = TypeInfo::of::<B>();

        let _a = ResolutionGuard::enter(1, a, 16).unwrap();
        let _b = ResolutionGuard::enter(1, b, 16).unwrap();

        match ResolutionGuard::enter(1, a, 16) {
            Err(ResolveErrorKind::CyclicDependency { path }) => assert_eq!(&*path, &[a, b, a]),
            _ => panic!("expected cyclic dependency"),
        }
    }

    #[test]
    fn test_guard_pops_on_drop() {
        let a = TypeInfo::of::<A>();

        drop(ResolutionGuard::enter(1, a, 16).unwrap());
        let _a = ResolutionGuard::enter(1, a, 16).unwrap();
    }

    #[test]
    fn test_injectors_tracked_separately() {
        let a = TypeInfo::of::<A>();

        let _first = ResolutionGuard::enter(1, a, 16).unwrap();
        let _second = ResolutionGuard::enter(2, a, 16).unwrap();
    }

    #[test]
    fn test_depth_exceeded() {
        let a = TypeInfo::of::<A>();
        let b = TypeInfo::of::<B>();

        let _a = ResolutionGuard::enter(1, a, 1).unwrap();
        assert!(matches!(
            ResolutionGuard::enter(1, b, 1),
            Err(ResolveErrorKind::DepthExceeded { depth: 1, .. })
        ));
    }
}
