//! Attribute macros used by the limb arithmetic in `poly1305-engine`.

use proc_macro::Delimiter;
use proc_macro::Group;
use proc_macro::Ident;
use proc_macro::Literal;
use proc_macro::Punct;
use proc_macro::Spacing;
use proc_macro::Span;
use proc_macro::TokenStream;
use proc_macro::TokenTree;

struct Unroll {
    index: Ident,
    start: Literal,
    count: usize,
    step: Literal,
}

fn parse_unroll(attr: TokenStream) -> Result<Unroll, &'static str> {
    let args: Vec<TokenTree> = attr
        .into_iter()
        .filter(|tt| !matches!(tt, TokenTree::Punct(p) if p.as_char() == ','))
        .collect();

    let index = match args.first() {
        Some(TokenTree::Ident(ident)) => ident.clone(),
        _ => return Err("loop_unroll: first argument must be an identifier"),
    };
    let start = match args.get(1) {
        Some(TokenTree::Literal(lit)) => lit.clone(),
        _ => return Err("loop_unroll: second argument must be an integer literal"),
    };
    let count = match args.get(2) {
        Some(TokenTree::Literal(lit)) => lit
            .to_string()
            .parse::<usize>()
            .map_err(|_| "loop_unroll: iteration count must be an unsuffixed integer")?,
        _ => return Err("loop_unroll: third argument must be an integer literal"),
    };
    let step = match args.get(3) {
        Some(TokenTree::Literal(lit)) => lit.clone(),
        None => Literal::usize_unsuffixed(1),
        _ => return Err("loop_unroll: fourth argument must be an integer literal"),
    };
    if args.len() > 4 {
        return Err("loop_unroll: expected at most four arguments");
    }

    Ok(Unroll { index, start, count, step })
}

fn compile_error(msg: &str) -> TokenStream {
    let mut args = TokenStream::new();
    args.extend([TokenTree::Literal(Literal::string(msg))]);

    let mut out = TokenStream::new();
    out.extend([
        TokenTree::Ident(Ident::new("compile_error", Span::call_site())),
        TokenTree::Punct(Punct::new('!', Spacing::Alone)),
        TokenTree::Group(Group::new(Delimiter::Parenthesis, args)),
        TokenTree::Punct(Punct::new(';', Spacing::Alone)),
    ]);
    TokenStream::from(TokenTree::Group(Group::new(Delimiter::Brace, out)))
}

/// Repeats the body of the annotated item `count` times in a single block.
///
/// `#[loop_unroll(i, start, count)]` or `#[loop_unroll(i, start, count, step)]`.
/// The index variable is bound to `start` and advanced by `step` between
/// copies; use `_` when the body does not need it. The annotated item is
/// only a carrier for the body, its name and signature are discarded.
#[proc_macro_attribute]
pub fn loop_unroll(attr: TokenStream, item: TokenStream) -> TokenStream {
    let unroll = match parse_unroll(attr) {
        Ok(unroll) => unroll,
        Err(msg) => return compile_error(msg),
    };

    let body = item.into_iter().find_map(|tt| match tt {
        TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => Some(group),
        _ => None,
    });
    let body = match body {
        Some(body) => body,
        None => return compile_error("loop_unroll: annotated item has no body"),
    };

    let bind_index = unroll.index.to_string() != "_";
    let mut out = TokenStream::new();

    if bind_index {
        out.extend([
            TokenTree::Ident(Ident::new("let", Span::call_site())),
            TokenTree::Ident(Ident::new("mut", Span::call_site())),
            TokenTree::Ident(unroll.index.clone()),
            TokenTree::Punct(Punct::new('=', Spacing::Alone)),
            TokenTree::Literal(unroll.start.clone()),
            TokenTree::Punct(Punct::new(';', Spacing::Alone)),
        ]);
    }

    for n in 0..unroll.count {
        out.extend([TokenTree::Group(body.clone())]);

        let last = n + 1 == unroll.count;
        if bind_index && !last {
            out.extend([
                TokenTree::Ident(unroll.index.clone()),
                TokenTree::Punct(Punct::new('+', Spacing::Joint)),
                TokenTree::Punct(Punct::new('=', Spacing::Alone)),
                TokenTree::Literal(unroll.step.clone()),
                TokenTree::Punct(Punct::new(';', Spacing::Alone)),
            ]);
        }
    }

    TokenStream::from(TokenTree::Group(Group::new(Delimiter::Brace, out)))
}
