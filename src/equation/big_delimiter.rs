//! Brace cleanup around `\big`-family delimiters.

/// Literal `(pattern, replacement)` pairs, applied in order.
///
/// Each pattern is a sized delimiter whose delimiter token was wrapped in
/// braces by the recognizer (`\big{(}`); the replacement drops the braces.
pub(super) const BIG_DELIMITER_REPLACEMENTS: &[(&str, &str)] = &[
    (r"\big{)}", r"\big)"),
    (r"\big{(}", r"\big("),
    (r"\big {)}", r"\big)"),
    (r"\big {(}", r"\big("),
    (r"\bigr{)}", r"\bigr)"),
    (r"\bigr{(}", r"\bigr("),
    (r"\bigr {)}", r"\bigr)"),
    (r"\bigr {(}", r"\bigr("),
    (r"\bigm{)}", r"\bigm)"),
    (r"\bigm{(}", r"\bigm("),
    (r"\bigm {)}", r"\bigm)"),
    (r"\bigm {(}", r"\bigm("),
    (r"\bigl{)}", r"\bigl)"),
    (r"\bigl{(}", r"\bigl("),
    (r"\bigl {)}", r"\bigl)"),
    (r"\bigl {(}", r"\bigl("),
    (r"\bigg{)}", r"\bigg)"),
    (r"\bigg{(}", r"\bigg("),
    (r"\bigg {)}", r"\bigg)"),
    (r"\bigg {(}", r"\bigg("),
    (r"\biggr{)}", r"\biggr)"),
    (r"\biggr{(}", r"\biggr("),
    (r"\biggr {)}", r"\biggr)"),
    (r"\biggr {(}", r"\biggr("),
    (r"\biggm{)}", r"\biggm)"),
    (r"\biggm{(}", r"\biggm("),
    (r"\biggm {)}", r"\biggm)"),
    (r"\biggm {(}", r"\biggm("),
    (r"\biggl{)}", r"\biggl)"),
    (r"\biggl{(}", r"\biggl("),
    (r"\biggl {)}", r"\biggl)"),
    (r"\biggl {(}", r"\biggl("),
    (r"\Big{)}", r"\Big)"),
    (r"\Big{(}", r"\Big("),
    (r"\Big {)}", r"\Big)"),
    (r"\Big {(}", r"\Big("),
    (r"\Bigr{)}", r"\Bigr)"),
    (r"\Bigr{(}", r"\Bigr("),
    (r"\Bigr {)}", r"\Bigr)"),
    (r"\Bigr {(}", r"\Bigr("),
    (r"\Bigm{)}", r"\Bigm)"),
    (r"\Bigm{(}", r"\Bigm("),
    (r"\Bigm {)}", r"\Bigm)"),
    (r"\Bigm {(}", r"\Bigm("),
    (r"\Bigl{)}", r"\Bigl)"),
    (r"\Bigl{(}", r"\Bigl("),
    (r"\Bigl {)}", r"\Bigl)"),
    (r"\Bigl {(}", r"\Bigl("),
    (r"\Bigg{)}", r"\Bigg)"),
    (r"\Bigg{(}", r"\Bigg("),
    (r"\Bigg {)}", r"\Bigg)"),
    (r"\Bigg {(}", r"\Bigg("),
    (r"\Biggr{)}", r"\Biggr)"),
    (r"\Biggr{(}", r"\Biggr("),
    (r"\Biggr {)}", r"\Biggr)"),
    (r"\Biggr {(}", r"\Biggr("),
    (r"\Biggm{)}", r"\Biggm)"),
    (r"\Biggm{(}", r"\Biggm("),
    (r"\Biggm {)}", r"\Biggm)"),
    (r"\Biggm {(}", r"\Biggm("),
    (r"\Biggl{)}", r"\Biggl)"),
    (r"\Biggl{(}", r"\Biggl("),
    (r"\Biggl {)}", r"\Biggl)"),
    (r"\Biggl {(}", r"\Biggl("),
    (r"\big{\}}", r"\big\}"),
    (r"\big{\{}", r"\big\{"),
    (r"\big {\}}", r"\big\}"),
    (r"\big {\{}", r"\big\{"),
    (r"\bigr{\}}", r"\bigr\}"),
    (r"\bigr{\{}", r"\bigr\{"),
    (r"\bigr {\}}", r"\bigr\}"),
    (r"\bigr {\{}", r"\bigr\{"),
    (r"\bigm{\}}", r"\bigm\}"),
    (r"\bigm{\{}", r"\bigm\{"),
    (r"\bigm {\}}", r"\bigm\}"),
    (r"\bigm {\{}", r"\bigm\{"),
    (r"\bigl{\}}", r"\bigl\}"),
    (r"\bigl{\{}", r"\bigl\{"),
    (r"\bigl {\}}", r"\bigl\}"),
    (r"\bigl {\{}", r"\bigl\{"),
    (r"\bigg{\}}", r"\bigg\}"),
    (r"\bigg{\{}", r"\bigg\{"),
    (r"\bigg {\}}", r"\bigg\}"),
    (r"\bigg {\{}", r"\bigg\{"),
    (r"\biggr{\}}", r"\biggr\}"),
    (r"\biggr{\{}", r"\biggr\{"),
    (r"\biggr {\}}", r"\biggr\}"),
    (r"\biggr {\{}", r"\biggr\{"),
    (r"\biggm{\}}", r"\biggm\}"),
    (r"\biggm{\{}", r"\biggm\{"),
    (r"\biggm {\}}", r"\biggm\}"),
    (r"\biggm {\{}", r"\biggm\{"),
    (r"\biggl{\}}", r"\biggl\}"),
    (r"\biggl{\{}", r"\biggl\{"),
    (r"\biggl {\}}", r"\biggl\}"),
    (r"\biggl {\{}", r"\biggl\{"),
    (r"\Big{\}}", r"\Big\}"),
    (r"\Big{\{}", r"\Big\{"),
    (r"\Big {\}}", r"\Big\}"),
    (r"\Big {\{}", r"\Big\{"),
    (r"\Bigr{\}}", r"\Bigr\}"),
    (r"\Bigr{\{}", r"\Bigr\{"),
    (r"\Bigr {\}}", r"\Bigr\}"),
    (r"\Bigr {\{}", r"\Bigr\{"),
    (r"\Bigm{\}}", r"\Bigm\}"),
    (r"\Bigm{\{}", r"\Bigm\{"),
    (r"\Bigm {\}}", r"\Bigm\}"),
    (r"\Bigm {\{}", r"\Bigm\{"),
    (r"\Bigl{\}}", r"\Bigl\}"),
    (r"\Bigl{\{}", r"\Bigl\{"),
    (r"\Bigl {\}}", r"\Bigl\}"),
    (r"\Bigl {\{}", r"\Bigl\{"),
    (r"\Bigg{\}}", r"\Bigg\}"),
    (r"\Bigg{\{}", r"\Bigg\{"),
    (r"\Bigg {\}}", r"\Bigg\}"),
    (r"\Bigg {\{}", r"\Bigg\{"),
    (r"\Biggr{\}}", r"\Biggr\}"),
    (r"\Biggr{\{}", r"\Biggr\{"),
    (r"\Biggr {\}}", r"\Biggr\}"),
    (r"\Biggr {\{}", r"\Biggr\{"),
    (r"\Biggl{\}}", r"\Biggl\}"),
    (r"\Biggl{\{}", r"\Biggl\{"),
    (r"\Biggl {\}}", r"\Biggl\}"),
    (r"\Biggl {\{}", r"\Biggl\{"),
    (r"\big{|}", r"\big|"),
    (r"\Big{|}", r"\Big|"),
    (r"\big {|}", r"\big|"),
    (r"\Big {|}", r"\Big|"),
    (r"\bigm{|}", r"\bigm|"),
    (r"\Bigm{|}", r"\Bigm|"),
    (r"\bigm {|}", r"\bigm|"),
    (r"\Bigm {|}", r"\Bigm|"),
    (r"\bigr{|}", r"\bigr|"),
    (r"\Bigr{|}", r"\Bigr|"),
    (r"\bigr {|}", r"\bigr|"),
    (r"\Bigr {|}", r"\Bigr|"),
    (r"\bigl{|}", r"\bigl|"),
    (r"\Bigl{|}", r"\Bigl|"),
    (r"\bigl {|}", r"\bigl|"),
    (r"\Bigl {|}", r"\Bigl|"),
    (r"\bigg{|}", r"\bigg|"),
    (r"\Bigg{|}", r"\Bigg|"),
    (r"\bigg {|}", r"\bigg|"),
    (r"\Bigg {|}", r"\Bigg|"),
    (r"\biggr{|}", r"\biggr|"),
    (r"\Biggr{|}", r"\Biggr|"),
    (r"\biggr {|}", r"\biggr|"),
    (r"\Biggr {|}", r"\Biggr|"),
    (r"\biggm{|}", r"\biggm|"),
    (r"\Biggm{|}", r"\Biggm|"),
    (r"\biggm {|}", r"\biggm|"),
    (r"\Biggm {|}", r"\Biggm|"),
    (r"\biggl{|}", r"\biggl|"),
    (r"\Biggl{|}", r"\Biggl|"),
    (r"\biggl {|}", r"\biggl|"),
    (r"\Biggl {|}", r"\Biggl|"),
    (r"\big{\|}", r"\big\|"),
    (r"\Big{\|}", r"\Big\|"),
    (r"\big {\|}", r"\big\|"),
    (r"\Big {\|}", r"\Big\|"),
    (r"\bigm{\|}", r"\bigm\|"),
    (r"\Bigm{\|}", r"\Bigm\|"),
    (r"\bigm {\|}", r"\bigm\|"),
    (r"\Bigm {\|}", r"\Bigm\|"),
    (r"\bigr{\|}", r"\bigr\|"),
    (r"\Bigr{\|}", r"\Bigr\|"),
    (r"\bigr {\|}", r"\bigr\|"),
    (r"\Bigr {\|}", r"\Bigr\|"),
    (r"\bigl{\|}", r"\bigl\|"),
    (r"\Bigl{\|}", r"\Bigl\|"),
    (r"\bigl {\|}", r"\bigl\|"),
    (r"\Bigl {\|}", r"\Bigl\|"),
    (r"\bigg{\|}", r"\bigg\|"),
    (r"\Bigg{\|}", r"\Bigg\|"),
    (r"\bigg {\|}", r"\bigg\|"),
    (r"\Bigg {\|}", r"\Bigg\|"),
    (r"\biggr{\|}", r"\biggr\|"),
    (r"\Biggr{\|}", r"\Biggr\|"),
    (r"\biggr {\|}", r"\biggr\|"),
    (r"\Biggr {\|}", r"\Biggr\|"),
    (r"\biggm{\|}", r"\biggm\|"),
    (r"\Biggm{\|}", r"\Biggm\|"),
    (r"\biggm {\|}", r"\biggm\|"),
    (r"\Biggm {\|}", r"\Biggm\|"),
    (r"\biggl{\|}", r"\biggl\|"),
    (r"\Biggl{\|}", r"\Biggl\|"),
    (r"\biggl {\|}", r"\biggl\|"),
    (r"\Biggl {\|}", r"\Biggl\|"),
    (r"\big{]}", r"\big]"),
    (r"\Big{]}", r"\Big]"),
    (r"\big {]}", r"\big]"),
    (r"\Big {]}", r"\Big]"),
    (r"\big{[}", r"\big["),
    (r"\Big{[}", r"\Big["),
    (r"\big {[}", r"\big["),
    (r"\Big {[}", r"\Big["),
    (r"\bigm{]}", r"\bigm]"),
    (r"\Bigm{]}", r"\Bigm]"),
    (r"\bigm {]}", r"\bigm]"),
    (r"\Bigm {]}", r"\Bigm]"),
    (r"\bigm{[}", r"\bigm["),
    (r"\Bigm{[}", r"\Bigm["),
    (r"\bigm {[}", r"\bigm["),
    (r"\Bigm {[}", r"\Bigm["),
    (r"\bigr{]}", r"\bigr]"),
    (r"\Bigr{]}", r"\Bigr]"),
    (r"\bigr {]}", r"\bigr]"),
    (r"\Bigr {]}", r"\Bigr]"),
    (r"\bigr{[}", r"\bigr["),
    (r"\Bigr{[}", r"\Bigr["),
    (r"\bigr {[}", r"\bigr["),
    (r"\Bigr {[}", r"\Bigr["),
    (r"\bigl{]}", r"\bigl]"),
    (r"\Bigl{]}", r"\Bigl]"),
    (r"\bigl {]}", r"\bigl]"),
    (r"\Bigl {]}", r"\Bigl]"),
    (r"\bigl{[}", r"\bigl["),
    (r"\Bigl{[}", r"\Bigl["),
    (r"\bigl {[}", r"\bigl["),
    (r"\Bigl {[}", r"\Bigl["),
    (r"\bigg{]}", r"\bigg]"),
    (r"\Bigg{]}", r"\Bigg]"),
    (r"\bigg {]}", r"\bigg]"),
    (r"\Bigg {]}", r"\Bigg]"),
    (r"\bigg{[}", r"\bigg["),
    (r"\Bigg{[}", r"\Bigg["),
    (r"\bigg {[}", r"\bigg["),
    (r"\Bigg {[}", r"\Bigg["),
    (r"\biggr{]}", r"\biggr]"),
    (r"\Biggr{]}", r"\Biggr]"),
    (r"\biggr {]}", r"\biggr]"),
    (r"\Biggr {]}", r"\Biggr]"),
    (r"\biggr{[}", r"\biggr["),
    (r"\Biggr{[}", r"\Biggr["),
    (r"\biggr {[}", r"\biggr["),
    (r"\Biggr {[}", r"\Biggr["),
    (r"\biggm{[}", r"\biggm["),
    (r"\Biggm{[}", r"\Biggm["),
    (r"\biggm {[}", r"\biggm["),
    (r"\Biggm {[}", r"\Biggm["),
    (r"\biggm{]}", r"\biggm]"),
    (r"\Biggm{]}", r"\Biggm]"),
    (r"\biggm {]}", r"\biggm]"),
    (r"\Biggm {]}", r"\Biggm]"),
    (r"\biggl{[}", r"\biggl["),
    (r"\Biggl{[}", r"\Biggl["),
    (r"\biggl {[}", r"\biggl["),
    (r"\Biggl {[}", r"\Biggl["),
    (r"\biggl{]}", r"\biggl]"),
    (r"\Biggl{]}", r"\Biggl]"),
    (r"\biggl {]}", r"\biggl]"),
    (r"\Biggl {]}", r"\Biggl]"),
    (r"\big{\rangle}", r"\big\rangle "),
    (r"\big{\langle}", r"\big\langle "),
    (r"\big {\rangle}", r"\big\rangle "),
    (r"\big {\langle}", r"\big\langle "),
    (r"\bigr{\rangle}", r"\bigr\rangle "),
    (r"\bigr{\langle}", r"\bigr\langle "),
    (r"\bigr {\rangle}", r"\bigr\rangle "),
    (r"\bigr {\langle}", r"\bigr\langle "),
    (r"\bigm{\rangle}", r"\bigm\rangle "),
    (r"\bigm{\langle}", r"\bigm\langle "),
    (r"\bigm {\rangle}", r"\bigm\rangle "),
    (r"\bigm {\langle}", r"\bigm\langle "),
    (r"\bigl{\rangle}", r"\bigl\rangle "),
    (r"\bigl{\langle}", r"\bigl\langle "),
    (r"\bigl {\rangle}", r"\bigl\rangle "),
    (r"\bigl {\langle}", r"\bigl\langle "),
    (r"\bigg{\rangle}", r"\bigg\rangle "),
    (r"\bigg{\langle}", r"\bigg\langle "),
    (r"\bigg {\rangle}", r"\bigg\rangle "),
    (r"\bigg {\langle}", r"\bigg\langle "),
    (r"\biggr{\rangle}", r"\biggr\rangle "),
    (r"\biggr{\langle}", r"\biggr\langle "),
    (r"\biggr {\rangle}", r"\biggr\rangle "),
    (r"\biggr {\langle}", r"\biggr\langle "),
    (r"\biggm{\rangle}", r"\biggm\rangle "),
    (r"\biggm{\langle}", r"\biggm\langle "),
    (r"\biggm {\rangle}", r"\biggm\rangle "),
    (r"\biggm {\langle}", r"\biggm\langle "),
    (r"\biggl{\rangle}", r"\biggl\rangle "),
    (r"\biggl{\langle}", r"\biggl\langle "),
    (r"\biggl {\rangle}", r"\biggl\rangle "),
    (r"\biggl {\langle}", r"\biggl\langle "),
    (r"\Big{\rangle}", r"\Big\rangle "),
    (r"\Big{\langle}", r"\Big\langle "),
    (r"\Big {\rangle}", r"\Big\rangle "),
    (r"\Big {\langle}", r"\Big\langle "),
    (r"\Bigr{\rangle}", r"\Bigr\rangle "),
    (r"\Bigr{\langle}", r"\Bigr\langle "),
    (r"\Bigr {\rangle}", r"\Bigr\rangle "),
    (r"\Bigr {\langle}", r"\Bigr\langle "),
    (r"\Bigm{\rangle}", r"\Bigm\rangle "),
    (r"\Bigm{\langle}", r"\Bigm\langle "),
    (r"\Bigm {\rangle}", r"\Bigm\rangle "),
    (r"\Bigm {\langle}", r"\Bigm\langle "),
    (r"\Bigl{\rangle}", r"\Bigl\rangle "),
    (r"\Bigl{\langle}", r"\Bigl\langle "),
    (r"\Bigl {\rangle}", r"\Bigl\rangle "),
    (r"\Bigl {\langle}", r"\Bigl\langle "),
    (r"\Bigg{\rangle}", r"\Bigg\rangle "),
    (r"\Bigg{\langle}", r"\Bigg\langle "),
    (r"\Bigg {\rangle}", r"\Bigg\rangle "),
    (r"\Bigg {\langle}", r"\Bigg\langle "),
    (r"\Biggr{\rangle}", r"\Biggr\rangle "),
    (r"\Biggr{\langle}", r"\Biggr\langle "),
    (r"\Biggr {\rangle}", r"\Biggr\rangle "),
    (r"\Biggr {\langle}", r"\Biggr\langle "),
    (r"\Biggl{\rangle}", r"\Biggl\rangle "),
    (r"\Biggl{\langle}", r"\Biggl\langle "),
    (r"\Biggl {\rangle}", r"\Biggl\rangle "),
    (r"\Biggl {\langle}", r"\Biggl\langle "),
    (r"\bigtimes", r"\times"),
];
