use common::{Buffer3, Scoped};

/// Per-tile operation driven by the tiled processor.
///
/// `run` receives samples in `[0, 1]` and must return a buffer `scale()`
/// times larger in both dimensions with the same channel count. Values
/// outside `[0, 1]` are clamped by the caller.
pub trait Transform {
    fn scale(&self) -> usize;

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>>;
}

/// Hands out a transform for one invocation. Whatever the transform holds is
/// released when the returned value is dropped.
pub trait TransformSource {
    type Transform: Transform;

    fn acquire(&self) -> anyhow::Result<Self::Transform>;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn scale(&self) -> usize {
        (**self).scale()
    }

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>> {
        (**self).run(input)
    }
}

impl<T: Transform + ?Sized> Transform for &mut T {
    fn scale(&self) -> usize {
        (**self).scale()
    }

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>> {
        (**self).run(input)
    }
}

impl<T, F> Transform for Scoped<T, F>
where
    T: Transform,
    F: FnOnce(T),
{
    fn scale(&self) -> usize {
        (**self).scale()
    }

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>> {
        (**self).run(input)
    }
}

impl<S: TransformSource + ?Sized> TransformSource for &S {
    type Transform = S::Transform;

    fn acquire(&self) -> anyhow::Result<Self::Transform> {
        (**self).acquire()
    }
}
