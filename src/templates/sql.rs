//! SQL text of the arg_min/arg_max family
//!
//! Fragments carry `{{direction}}`, `{{operator}}` and `{{extreme}}`, which
//! are rendered per [`Direction`] while the pair is assembled. Only `{{type}}`
//! survives into the finished template.
//!
//! The reducer is declared `strict` with no initial condition: the engine
//! seeds the state with the first row and an empty group never reaches the
//! finalizer, so the aggregate yields null. The same reducer is registered
//! as `combinefunc`, which is what lets partial aggregates be merged.

use crate::reducer::Direction;

use super::expander::substitute;

const BLOCK_HEADER: &str = "
-- arg_min / arg_max over {{type}}
";

const COMPOSITE_TYPE: &str = "
create type {{type}}_and_value as (arg {{type}}, value int8);
";

const REDUCER: &str = "
create function arg_{{direction}}_agg_{{type}}(a {{type}}_and_value, b {{type}}_and_value)
    returns {{type}}_and_value
    language sql immutable strict parallel safe
as $$
    select case when a.arg is null then b
                when b.arg is null then a
                when a.value {{operator}} b.value then a
                else b end
$$;
";

const PROJECTION: &str = "
create function arg_from_{{type}}_and_value(a {{type}}_and_value)
    returns {{type}}
    language sql immutable strict parallel safe
as $$
    select a.arg
$$;
";

const AGGREGATE: &str = "
create aggregate arg_{{direction}}_{{type}}({{type}}_and_value) (
    sfunc = arg_{{direction}}_agg_{{type}},
    stype = {{type}}_and_value,
    combinefunc = arg_{{direction}}_agg_{{type}},
    finalfunc = arg_from_{{type}}_and_value,
    parallel = safe
);

comment on aggregate arg_{{direction}}_{{type}}({{type}}_and_value) is
    'For arg_{{direction}}_{{type}}((a, v)), return the a whose v is {{extreme}}. \
Among rows tied on v the winner is unspecified, but stable for equal inputs';
";

const DROP_AGGREGATE: &str = "drop aggregate arg_{{direction}}_{{type}}({{type}}_and_value);
";

const DROP_PROJECTION: &str = "drop function arg_from_{{type}}_and_value({{type}}_and_value);
";

const DROP_REDUCER: &str =
    "drop function arg_{{direction}}_agg_{{type}}({{type}}_and_value, {{type}}_and_value);
";

const DROP_TYPE: &str = "drop type {{type}}_and_value;
";

fn render_direction(fragment: &str, direction: Direction) -> String {
    let out = substitute(fragment, "direction", direction.name());
    let out = substitute(&out, "operator", direction.sql_operator());
    substitute(&out, "extreme", direction.extreme())
}

fn push_each_direction(body: &mut String, fragment: &str) {
    for direction in Direction::ALL {
        body.push_str(&render_direction(fragment, direction));
    }
}

/// Creation order: composite, reducers, projection, aggregates
pub(super) fn apply_body() -> String {
    let mut body = String::from(BLOCK_HEADER);
    body.push_str(COMPOSITE_TYPE);
    push_each_direction(&mut body, REDUCER);
    body.push_str(PROJECTION);
    push_each_direction(&mut body, AGGREGATE);
    body
}

/// Exact reverse of the dependency edges created by [`apply_body`]
pub(super) fn revert_body() -> String {
    let mut body = String::from(BLOCK_HEADER);
    push_each_direction(&mut body, DROP_AGGREGATE);
    body.push_str(DROP_PROJECTION);
    push_each_direction(&mut body, DROP_REDUCER);
    body.push_str(DROP_TYPE);
    body
}
