mod palette_dom;
