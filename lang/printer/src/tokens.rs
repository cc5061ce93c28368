//! This module contains the symbols and keywords of the surface language and of the kernel.
//! These constants are used when we prettyprint source code and compiled terms.

// Symbols
//
//

/// The symbol `->`
pub const ARROW: &str = "->";

/// The symbol `=>`
pub const FAT_ARROW: &str = "=>";

/// The symbol `,`
pub const COMMA: &str = ",";

/// The symbol `:`
pub const COLON: &str = ":";

/// The symbol `.`
pub const DOT: &str = ".";

/// The symbol `|`
pub const PIPE: &str = "|";

/// The symbol `_`
pub const UNDERSCORE: &str = "_";

/// The symbol `\`
pub const BACKSLASH: &str = "\\";

/// The symbol `+`
pub const PLUS: &str = "+";

/// The symbol `=`
pub const EQ: &str = "=";

// Keywords
//
//

/// The keyword `data`
pub const DATA: &str = "data";

/// The keyword `def`
pub const DEF: &str = "def";

/// The keyword `match`
pub const MATCH: &str = "match";

/// The keyword `termination_by`
pub const TERMINATION_BY: &str = "termination_by";

/// The keyword `Type`
pub const TYPE: &str = "Type";

// Kernel primitives
//
//

/// The primitive `cases`
pub const CASES: &str = "cases";

/// The primitive `fix`
pub const FIX: &str = "fix";

/// The primitive `no_confusion`
pub const NO_CONFUSION: &str = "no_confusion";

/// The annotation `struct` on a structural fixpoint
pub const STRUCT: &str = "struct";

/// The annotation `measure` on a well-founded fixpoint
pub const MEASURE: &str = "measure";
