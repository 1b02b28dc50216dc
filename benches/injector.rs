#![allow(dead_code)]

use autowire::{provider, Inject, Injectable, InstantiateErrorKind, Injector, Recipe};
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA;

autowire::opaque_injectable!(A, B, C, CA, CAA, CAAA);

#[derive(Default)]
struct Leaf;

struct Branch(Arc<Leaf>, Arc<Leaf>);

impl Injectable for Leaf {
    fn recipe() -> Recipe<Self> {
        Recipe::from_default()
    }
}

impl Injectable for Branch {
    fn recipe() -> Recipe<Self> {
        Recipe::construct(|Inject(left): Inject<Leaf>, Inject(right): Inject<Leaf>| {
            Ok::<_, InstantiateErrorKind>(Branch(left, right))
        })
    }
}

#[inline]
fn injector_with_providers(singleton: bool) -> Injector {
    let injector = Injector::new();
    let register = |callable: autowire::Callable| {
        let callable = if singleton { callable.singleton() } else { callable };
        injector.register_provider(callable).unwrap();
    };

    register(provider(|| Ok::<_, InstantiateErrorKind>(CAAA)));
    register(provider(|Inject(caaa): Inject<CAAA>| Ok::<_, InstantiateErrorKind>(CAA(caaa))));
    register(provider(|Inject(caa): Inject<CAA>| Ok::<_, InstantiateErrorKind>(CA(caa))));
    register(provider(|Inject(ca): Inject<CA>| Ok::<_, InstantiateErrorKind>(C(ca))));
    register(provider(|| Ok::<_, InstantiateErrorKind>(B(2))));
    register(provider(|Inject(b): Inject<B>, Inject(c): Inject<C>| {
        Ok::<_, InstantiateErrorKind>(A(b, c))
    }));
    injector
}

#[inline]
fn injector_get<T: Injectable>(injector: &Injector) {
    let _ = injector.get::<T>().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let injector_1 = injector_with_providers(false);
    let injector_2 = injector_with_providers(true);
    let injector_3 = Injector::new();

    c.bench_function("injector_new_with_providers", |b| b.iter(|| injector_with_providers(false)))
        .bench_function("injector_get", |b| b.iter(|| injector_get::<A>(&injector_1)))
        .bench_function("injector_get_with_cache", |b| b.iter(|| injector_get::<A>(&injector_2)))
        .bench_function("injector_get_constructed", |b| b.iter(|| injector_get::<Branch>(&injector_3)))
        .bench_function("injector_call", |b| {
            b.iter(|| {
                injector_1
                    .call(|Inject(a): Inject<A>, Inject(branch): Inject<Branch>| {
                        Ok::<_, InstantiateErrorKind>((a, branch))
                    })
                    .unwrap()
            })
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
