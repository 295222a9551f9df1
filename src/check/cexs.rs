//! Model extraction for unproven goals.

crate::prelude!();

use term::{Cst, Sort};

/// A model falsifying a proof attempt.
///
/// When the negation of a goal is satisfiable together with the instances asserted, the solver
/// produces a model. The model gives a value to each declared constant, and a definition to each
/// declared function the solver had to interpret.
#[derive(Debug, Clone)]
pub struct Cex {
    /// Value for each constant of the model.
    ///
    /// Values of a built-in sort are parsed as constants. Anything else, internal solver values
    /// over declared sorts for instance, is kept as a raw string.
    pub values: Map<String, (Sort, Either<Cst, String>)>,
    /// Definition for each function symbol of the model, as raw strings.
    ///
    /// The key renders the symbol with its arguments and result sort, the value is the body Z3
    /// reported for it.
    pub funs: Map<String, String>,
}
impl Cex {
    /// Constructor.
    pub fn new() -> Self {
        Self {
            values: Map::new(),
            funs: Map::new(),
        }
    }

    /// True if the model gives no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.funs.is_empty()
    }

    /// Inserts a value for a constant.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        sort: Sort,
        value: Either<Cst, String>,
    ) -> Res<()> {
        let name = name.into();
        let prev = self.values.insert(name.clone(), (sort, value));
        if prev.is_some() {
            bail!("model defines a value for `{}` twice", name)
        } else {
            Ok(())
        }
    }

    /// Inserts a definition for a function symbol.
    pub fn insert_fun(&mut self, fun: impl Into<String>, def: impl Into<String>) -> Res<()> {
        let fun = fun.into();
        let prev = self.funs.insert(fun.clone(), def.into());
        if prev.is_some() {
            bail!("model defines a value for `{}` twice", fun)
        } else {
            Ok(())
        }
    }

    /// Populates itself given a solver.
    ///
    /// Uses `get_model` to retrieve the model. The solver must have answered `sat` to a check
    /// right before it is passed to this function.
    pub fn populate(&mut self, solver: &mut Solver) -> Res<()> {
        let model = solver.get_model().chain_err(|| "while retrieving model")?;
        for (name, args, sort, value) in model {
            if args.is_empty() {
                self.insert(name, sort, value)?
            } else {
                let mut desc = format!("({}", name);
                for (arg, sort) in args {
                    desc.push_str(&format!(" ({} {})", arg, sort));
                }
                desc.push_str(&format!(") {}", sort));
                let def = value.map_left(|cst| cst.to_string()).into_inner();
                self.insert_fun(desc, def)?
            }
        }
        Ok(())
    }
}
impl fmt::Display for Cex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut pref = "";
        for (name, (sort, value)) in &self.values {
            write!(fmt, "{}{}: {} = {}", pref, name, sort, value)?;
            pref = "\n";
        }
        for (fun, def) in &self.funs {
            write!(fmt, "{}{} = {}", pref, fun, def)?;
            pref = "\n";
        }
        Ok(())
    }
}

/// Type alias for rsmt2's solver equipped with our parser.
pub type Solver = SmtSolver<SmtParser>;

/// SMT-LIB parser for the idents, sorts and values of a model.
#[derive(Debug, Clone, Copy)]
pub struct SmtParser;
impl<'a> rsmt2::parse::IdentParser<String, Sort, &'a str> for SmtParser {
    fn parse_ident(self, input: &'a str) -> SmtRes<String> {
        Ok(input.trim().into())
    }
    fn parse_type(self, input: &'a str) -> SmtRes<Sort> {
        let input = input.trim();
        match input {
            "Bool" => Ok(Sort::Bool),
            "Int" => Ok(Sort::Int),
            "Real" => Ok(Sort::Rat),
            _ => Ok(Sort::usr(input)),
        }
    }
}
impl<'a, Br: std::io::BufRead>
    rsmt2::parse::ModelParser<String, Sort, Either<Cst, String>, &'a mut RSmtParser<Br>>
    for SmtParser
{
    fn parse_value(
        self,
        input: &'a mut RSmtParser<Br>,
        _: &String,
        _: &[(String, Sort)],
        _: &Sort,
    ) -> SmtRes<Either<Cst, String>> {
        let sexpr = input.get_sexpr()?;
        if let Some(cst) = Cst::of_smt2(sexpr) {
            Ok(Either::Left(cst))
        } else {
            Ok(Either::Right(sexpr.into()))
        }
    }
}
