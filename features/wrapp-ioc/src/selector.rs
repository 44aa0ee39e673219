use crate::{
    constructor::{Implementation, Parameter},
    errors::{ResolutionError, UnresolvedParameter},
};

/// The constructor chosen for an implementation and the plans for its arguments
#[derive(Debug)]
pub(crate) struct Selection<P> {
    pub candidate: usize,
    pub arguments: Vec<(&'static str, P)>,
}

/// Chooses the constructor to invoke
///
/// Candidates are tried from most to fewest parameters, equal counts keep declaration order.
/// A candidate is only chosen once every one of its parameters passed `check`, so nothing is
/// built for a constructor which turns out to be unusable.
///
/// If no candidate works, the failure of the richest candidate is reported: a circular dependency
/// is passed on as is, anything else becomes [ResolutionError::NoViableConstructor] carrying
/// the failure of every unresolved parameter.
pub(crate) fn select<P>(
    implementation: &Implementation,
    mut check: impl FnMut(&Parameter) -> Result<P, ResolutionError>,
) -> Result<Selection<P>, ResolutionError> {
    let candidates = implementation.candidates();

    let mut ranked: Vec<usize> = (0..candidates.len()).collect();
    // Stable sort keeps declaration order for ties
    ranked.sort_by_key(|&index| std::cmp::Reverse(candidates[index].parameter_count()));

    let mut richest_failure: Option<Vec<UnresolvedParameter>> = None;

    for index in ranked {
        let mut arguments = Vec::new();
        let mut failures = Vec::new();

        for parameter in candidates[index].parameters() {
            match check(parameter) {
                Ok(plan) => arguments.push((parameter.name(), plan)),
                Err(error) => failures.push(UnresolvedParameter {
                    name: parameter.name(),
                    error,
                }),
            }
        }

        if failures.is_empty() {
            tracing::trace!(
                "Selected constructor #{index} of {} with {} parameters",
                implementation.info(),
                arguments.len()
            );
            return Ok(Selection {
                candidate: index,
                arguments,
            });
        }

        richest_failure.get_or_insert(failures);
    }

    let mut failures = richest_failure.unwrap_or_default();

    if let Some(position) = failures.iter().position(|failure| failure.error.is_circular()) {
        return Err(failures.swap_remove(position).error);
    }

    Err(ResolutionError::NoViableConstructor {
        product: implementation.info(),
        unresolved: failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constructor::{Constructible, Constructor},
        registration::RegistrationKey,
    };

    /// Four constructors: (a), (a, b, c), (a, d, e), (d, a, e)
    struct Widget;
    impl Constructible for Widget {
        fn constructors() -> Vec<Constructor<Self>> {
            let p = Parameter::new::<u32>;
            vec![
                Constructor::new(vec![p("a")], |_| Ok(Widget)),
                Constructor::new(vec![p("a"), p("b"), p("c")], |_| Ok(Widget)),
                Constructor::new(vec![p("a"), p("d"), p("e")], |_| Ok(Widget)),
                Constructor::new(vec![p("d"), p("a"), p("e")], |_| Ok(Widget)),
            ]
        }
    }

    struct Nothing;
    impl Constructible for Nothing {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![]
        }
    }

    fn names(unresolved: &[UnresolvedParameter]) -> Vec<&'static str> {
        unresolved.iter().map(|parameter| parameter.name).collect()
    }

    fn unresolved(name: &str) -> ResolutionError {
        ResolutionError::UnregisteredAbstractType(RegistrationKey::of::<u32>(Some(name)))
    }

    fn resolvable(known: &'static [&'static str]) -> impl FnMut(&Parameter) -> Result<(), ResolutionError> {
        move |parameter| match known.contains(&parameter.name()) {
            true => Ok(()),
            false => Err(unresolved(parameter.name())),
        }
    }

    #[test]
    fn prefers_the_richest_constructor() {
        let implementation = Implementation::of::<Widget>();

        let selection = select(&implementation, resolvable(&["a", "b", "c", "d", "e"])).unwrap();

        assert_eq!(selection.candidate, 1);
        assert_eq!(
            selection.arguments.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn skips_rich_constructor_with_unresolvable_parameter() {
        let implementation = Implementation::of::<Widget>();

        let selection = select(&implementation, resolvable(&["a", "d", "e"])).unwrap();

        assert_eq!(selection.candidate, 2);
    }

    #[test]
    fn falls_back_to_shorter_constructor() {
        let implementation = Implementation::of::<Widget>();

        let selection = select(&implementation, resolvable(&["a"])).unwrap();

        assert_eq!(selection.candidate, 0);
    }

    #[test]
    fn reports_unresolved_parameters_of_richest_candidate() {
        let implementation = Implementation::of::<Widget>();

        let error = select(&implementation, resolvable(&["b"])).unwrap_err();

        match error {
            ResolutionError::NoViableConstructor { product, unresolved } => {
                assert_eq!(product, implementation.info());
                assert_eq!(names(&unresolved), vec!["a", "c"]);
                assert!(matches!(
                    &unresolved[0].error,
                    ResolutionError::UnregisteredAbstractType(key) if key.name.as_deref() == Some("a")
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn passes_cycles_on() {
        let implementation = Implementation::of::<Widget>();
        let key = RegistrationKey::of::<Widget>(None);

        let error = select(&implementation, |parameter: &Parameter| match parameter.name() {
            "c" => Err(ResolutionError::CircularDependency {
                requested: key.clone(),
                chain: vec![key.clone(), key.clone()],
            }),
            "b" => Ok(()),
            other => Err(unresolved(other)),
        })
        .unwrap_err();

        assert!(error.is_circular());
    }

    #[test]
    fn type_without_constructors_is_not_viable() {
        let implementation = Implementation::of::<Nothing>();

        let error = select(&implementation, resolvable(&[])).unwrap_err();

        assert!(matches!(
            error,
            ResolutionError::NoViableConstructor { unresolved, .. } if unresolved.is_empty()
        ));
    }
}
