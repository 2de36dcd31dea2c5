//! Golden tests for the generated `Enum()` accessors.
//!
//! Each case is written to a temporary `.go` file with a `package test`
//! clause, parsed, and generated for the type named on its first line.

use enumgen_core::enumerate::{collect, emit, resolve};
use enumgen_core::source::parse_go_files;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

struct Golden {
    name: &'static str,
    input: &'static str,
    output: &'static str,
}

const GOLDEN: &[Golden] = &[
    Golden {
        name: "day",
        input: DAY_IN,
        output: DAY_OUT,
    },
    Golden {
        name: "offset",
        input: OFFSET_IN,
        output: OFFSET_OUT,
    },
    Golden {
        name: "gap",
        input: GAP_IN,
        output: GAP_OUT,
    },
    Golden {
        name: "num",
        input: NUM_IN,
        output: NUM_OUT,
    },
    Golden {
        name: "unum",
        input: UNUM_IN,
        output: UNUM_OUT,
    },
    Golden {
        name: "unumpos",
        input: UNUMPOS_IN,
        output: UNUMPOS_OUT,
    },
    Golden {
        name: "prime",
        input: PRIME_IN,
        output: PRIME_OUT,
    },
    Golden {
        name: "prefix",
        input: PREFIX_IN,
        output: PREFIX_OUT,
    },
    Golden {
        name: "tokens",
        input: TOKENS_IN,
        output: TOKENS_OUT,
    },
];

// Simple enumeration of type int starting at 0.
const DAY_IN: &str = "type Day int
const (
\tMonday Day = iota
\tTuesday
\tWednesday
\tThursday
\tFriday
\tSaturday
\tSunday
)
";

const DAY_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Day) Enum() []interface{} {
\treturn []interface{}{
\t\tMonday,
\t\tTuesday,
\t\tWednesday,
\t\tThursday,
\t\tFriday,
\t\tSaturday,
\t\tSunday,
\t}
}
";

// An offset, and a duplicate that must not appear.
const OFFSET_IN: &str = "type Number int
const (
\t_ Number = iota
\tOne
\tTwo
\tThree
\tAnotherOne = One  // Duplicate; note that AnotherOne doesn't appear below.
)
";

const OFFSET_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Number) Enum() []interface{} {
\treturn []interface{}{
\t\tOne,
\t\tTwo,
\t\tThree,
\t}
}
";

const GAP_IN: &str = "type Gap int
const (
\tTwo Gap = 2
\tThree Gap = 3
\tFive Gap = 5
\tSix Gap = 6
\tSeven Gap = 7
\tEight Gap = 8
\tNine Gap = 9
\tEleven Gap = 11
)
";

const GAP_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Gap) Enum() []interface{} {
\treturn []interface{}{
\t\tTwo,
\t\tThree,
\t\tFive,
\t\tSix,
\t\tSeven,
\t\tEight,
\t\tNine,
\t\tEleven,
\t}
}
";

// Signed integers spanning zero.
const NUM_IN: &str = "type Num int
const (
\tm_2 Num = -2 + iota
\tm_1
\tm0
\tm1
\tm2
)
";

const NUM_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Num) Enum() []interface{} {
\treturn []interface{}{
\t\tm_2,
\t\tm_1,
\t\tm0,
\t\tm1,
\t\tm2,
\t}
}
";

// Unsigned integers spanning zero.
const UNUM_IN: &str = "type Unum uint
const (
\tm_2 Unum = iota + 253
\tm_1
)

const (
\tm0 Unum = iota
\tm1
\tm2
)
";

const UNUM_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Unum) Enum() []interface{} {
\treturn []interface{}{
\t\tm_2,
\t\tm_1,
\t\tm0,
\t\tm1,
\t\tm2,
\t}
}
";

const UNUMPOS_IN: &str = "type Unumpos uint
const (
\tm253 Unumpos = iota + 253
\tm254
)

const (
\tm1 Unumpos = iota + 1
\tm2
\tm3
)
";

const UNUMPOS_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Unumpos) Enum() []interface{} {
\treturn []interface{}{
\t\tm253,
\t\tm254,
\t\tm1,
\t\tm2,
\t\tm3,
\t}
}
";

// Sparse values with one duplicate (p77).
const PRIME_IN: &str = "type Prime int
const (
\tp2 Prime = 2
\tp3 Prime = 3
\tp5 Prime = 5
\tp7 Prime = 7
\tp77 Prime = 7 // Duplicate; note that p77 doesn't appear below.
\tp11 Prime = 11
\tp13 Prime = 13
\tp17 Prime = 17
\tp19 Prime = 19
\tp23 Prime = 23
\tp29 Prime = 29
\tp37 Prime = 31
\tp41 Prime = 41
\tp43 Prime = 43
)
";

const PRIME_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Prime) Enum() []interface{} {
\treturn []interface{}{
\t\tp2,
\t\tp3,
\t\tp5,
\t\tp7,
\t\tp11,
\t\tp13,
\t\tp17,
\t\tp19,
\t\tp23,
\t\tp29,
\t\tp37,
\t\tp41,
\t\tp43,
\t}
}
";

const PREFIX_IN: &str = "type Type int
const (
\tTypeInt Type = iota
\tTypeString
\tTypeFloat
\tTypeRune
\tTypeByte
\tTypeStruct
\tTypeSlice
)
";

const PREFIX_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Type) Enum() []interface{} {
\treturn []interface{}{
\t\tTypeInt,
\t\tTypeString,
\t\tTypeFloat,
\t\tTypeRune,
\t\tTypeByte,
\t\tTypeStruct,
\t\tTypeSlice,
\t}
}
";

// Comments interleaved with the constants.
const TOKENS_IN: &str = "type Token int
const (
\tAnd Token = iota // &
\tOr               // |
\tAdd              // +
\tSub              // -
\tIdent
\tPeriod // .

\t// not to be used
\tSingleBefore
\t// not to be used
\tBeforeAndInline // inline
\tInlineGeneral /* inline general */
)
";

const TOKENS_OUT: &str = "
// Enum returns a list of values declared for a type.
func (Token) Enum() []interface{} {
\treturn []interface{}{
\t\tAnd,
\t\tOr,
\t\tAdd,
\t\tSub,
\t\tIdent,
\t\tPeriod,
\t\tSingleBefore,
\t\tBeforeAndInline,
\t\tInlineGeneral,
\t}
}
";

/// The type name is the second word of the first line.
fn type_name(input: &str) -> &str {
    let tokens: Vec<&str> = input.splitn(3, ' ').collect();
    assert_eq!(tokens.len(), 3, "need type declaration on first line");
    tokens[1]
}

#[test]
fn test_golden() {
    let dir = TempDir::new().unwrap();

    for test in GOLDEN {
        let path = dir.path().join(format!("{}.go", test.name));
        fs::write(&path, format!("package test\n{}", test.input)).unwrap();

        let files = parse_go_files(&[path]).unwrap();
        let type_name = type_name(test.input);
        let collected = collect(&files, type_name).unwrap();
        let result = resolve(&collected).unwrap();
        let got = emit(&result, type_name).unwrap();

        assert_eq!(got, test.output, "{}", test.name);
    }
}

#[test]
fn test_prime_suppresses_duplicate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prime.go");
    fs::write(&path, format!("package test\n{}", PRIME_IN)).unwrap();

    let files = parse_go_files(&[path]).unwrap();
    let result = resolve(&collect(&files, "Prime").unwrap()).unwrap();

    assert_eq!(result.len(), 13);
    assert_eq!(result.suppressed.len(), 1);
    assert_eq!(result.suppressed[0].constant.identifier, "p77");
    assert_eq!(result.suppressed[0].duplicate_of, "p7");
}

#[test]
fn test_unsigned_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unum.go");
    fs::write(&path, format!("package test\n{}", UNUM_IN)).unwrap();

    let files = parse_go_files(&[path]).unwrap();
    let result = resolve(&collect(&files, "Unum").unwrap()).unwrap();

    assert_eq!(result.values().collect::<Vec<_>>(), vec![253, 254, 0, 1, 2]);
}

#[test]
fn test_scenarios_split_across_files() {
    let dir = TempDir::new().unwrap();
    let decl = dir.path().join("a.go");
    let consts = dir.path().join("b.go");
    fs::write(&decl, "package test\ntype Day int\n").unwrap();
    fs::write(&consts, format!("package test\n{}", &DAY_IN["type Day int\n".len()..])).unwrap();

    let files = parse_go_files(&[decl, consts]).unwrap();
    let result = resolve(&collect(&files, "Day").unwrap()).unwrap();

    assert_eq!(emit(&result, "Day").unwrap(), DAY_OUT);
}
